use thiserror::Error;

/// Errors raised while mapping records to and from archive nodes.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// The archive carries keys the record type does not declare.
    #[error("Archived {class} has undeclared fields: {}", .keys.join(", "))]
    SchemaViolation { class: String, keys: Vec<String> },

    #[error("Unknown archive class: {0}")]
    UnknownClass(String),

    #[error("Expected archived {expected}, found {found}")]
    ClassMismatch { expected: &'static str, found: String },

    #[error("Field '{field}' expected {expected}, found {found}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Codec error: {0}")]
    Codec(String),
}

impl ArchiveError {
    pub(crate) fn type_mismatch(expected: &'static str, found: &'static str) -> Self {
        ArchiveError::TypeMismatch {
            field: String::new(),
            expected,
            found,
        }
    }

    /// Attributes a field-less type mismatch to `class.field`.
    pub(crate) fn at_field(self, class: &str, field: &str) -> Self {
        match self {
            ArchiveError::TypeMismatch {
                field: current,
                expected,
                found,
            } if current.is_empty() => ArchiveError::TypeMismatch {
                field: format!("{}.{}", class, field),
                expected,
                found,
            },
            other => other,
        }
    }
}
