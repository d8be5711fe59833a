//! Typed field tables and the per-value conversions they are built from.

use super::error::ArchiveError;
use super::registry::KnownClasses;
use super::value::{undeclared_keys, ArchiveNode, ArchiveValue};
use std::collections::BTreeSet;

/// Declares the typed record behind one archive class.
///
/// Generates the [`FieldTable`] of `$ty` (class tag, declared field names,
/// field accessors) and lets `$ty` nest inside other records. Field names are
/// the archived names before key transformation, e.g. `"NSrelative"`.
/// Missing fields keep the value from `Default::default()`.
#[macro_export]
macro_rules! archived_record {
    ($ty:ident, $class:literal, { $($field:ident => $name:literal),* $(,)? }) => {
        impl $crate::archive::FieldTable for $ty {
            const CLASS_NAME: &'static str = $class;
            const FIELDS: &'static [&'static str] = &[$($name),*];

            fn write_fields(&self, node: &mut $crate::archive::ArchiveNode) {
                $(
                    node.insert_field(
                        $name,
                        $crate::archive::ArchiveField::to_archive(&self.$field),
                    );
                )*
            }

            fn read_fields(
                reader: &mut $crate::archive::FieldReader<'_>,
            ) -> Result<Self, $crate::archive::ArchiveError> {
                let mut record = <Self as Default>::default();
                $(
                    reader.read($name, &mut record.$field)?;
                )*
                Ok(record)
            }
        }

        impl $crate::archive::ArchiveField for $ty {
            fn to_archive(&self) -> $crate::archive::ArchiveValue {
                $crate::archive::ArchiveValue::Object(
                    <Self as $crate::archive::Archivable>::encode(self),
                )
            }

            fn from_archive(
                value: $crate::archive::ArchiveValue,
                classes: &$crate::archive::KnownClasses,
            ) -> Result<Self, $crate::archive::ArchiveError> {
                $crate::archive::decode_nested::<Self>(value, classes)
            }
        }
    };
}

/// Conversion of one field value to and from its archived form.
pub trait ArchiveField: Sized {
    fn to_archive(&self) -> ArchiveValue;

    fn from_archive(value: ArchiveValue, classes: &KnownClasses) -> Result<Self, ArchiveError>;
}

/// Static description of a record type: its class tag and declared fields.
pub trait FieldTable: Sized + Default {
    const CLASS_NAME: &'static str;
    const FIELDS: &'static [&'static str];

    fn write_fields(&self, node: &mut ArchiveNode);

    fn read_fields(reader: &mut FieldReader<'_>) -> Result<Self, ArchiveError>;
}

/// A record that can be mapped to and from an [`ArchiveNode`].
pub trait Archivable: FieldTable {
    fn encode(&self) -> ArchiveNode {
        let mut node = ArchiveNode::new(Self::CLASS_NAME);
        self.write_fields(&mut node);
        node
    }

    /// Decodes `node`, rejecting any key the field table does not declare.
    fn decode(node: ArchiveNode, classes: &KnownClasses) -> Result<Self, ArchiveError> {
        let keys = undeclared_keys(&node, Self::FIELDS);
        if !keys.is_empty() {
            return Err(ArchiveError::SchemaViolation {
                class: node.class,
                keys,
            });
        }
        let mut reader = FieldReader::new(node, classes);
        Self::read_fields(&mut reader)
    }
}

/// Hands out the fields of one node to a record's field table.
pub struct FieldReader<'a> {
    node: ArchiveNode,
    classes: &'a KnownClasses,
}

impl<'a> FieldReader<'a> {
    pub fn new(node: ArchiveNode, classes: &'a KnownClasses) -> Self {
        FieldReader { node, classes }
    }

    /// Overwrites `target` with the archived value of `field`, if present.
    pub fn read<T: ArchiveField>(&mut self, field: &str, target: &mut T) -> Result<(), ArchiveError> {
        if let Some(value) = self.node.take_field(field) {
            *target = T::from_archive(value, self.classes)
                .map_err(|e| e.at_field(&self.node.class, field))?;
        }
        Ok(())
    }
}

/// Decodes a record nested as an object value inside another record.
pub fn decode_nested<T: Archivable>(
    value: ArchiveValue,
    classes: &KnownClasses,
) -> Result<T, ArchiveError> {
    match value {
        ArchiveValue::Object(node) => {
            if !classes.contains(&node.class) {
                return Err(ArchiveError::UnknownClass(node.class));
            }
            if node.class != T::CLASS_NAME {
                return Err(ArchiveError::ClassMismatch {
                    expected: T::CLASS_NAME,
                    found: node.class,
                });
            }
            T::decode(node, classes)
        }
        other => Err(ArchiveError::type_mismatch(T::CLASS_NAME, other.kind())),
    }
}

impl ArchiveField for String {
    fn to_archive(&self) -> ArchiveValue {
        ArchiveValue::String(self.clone())
    }

    fn from_archive(value: ArchiveValue, _: &KnownClasses) -> Result<Self, ArchiveError> {
        match value {
            ArchiveValue::String(s) => Ok(s),
            other => Err(ArchiveError::type_mismatch("string", other.kind())),
        }
    }
}

impl ArchiveField for bool {
    fn to_archive(&self) -> ArchiveValue {
        ArchiveValue::Bool(*self)
    }

    fn from_archive(value: ArchiveValue, _: &KnownClasses) -> Result<Self, ArchiveError> {
        match value {
            ArchiveValue::Bool(b) => Ok(b),
            other => Err(ArchiveError::type_mismatch("bool", other.kind())),
        }
    }
}

impl ArchiveField for i64 {
    fn to_archive(&self) -> ArchiveValue {
        ArchiveValue::Integer(*self)
    }

    fn from_archive(value: ArchiveValue, _: &KnownClasses) -> Result<Self, ArchiveError> {
        match value {
            ArchiveValue::Integer(i) => Ok(i),
            other => Err(ArchiveError::type_mismatch("integer", other.kind())),
        }
    }
}

impl ArchiveField for f64 {
    fn to_archive(&self) -> ArchiveValue {
        ArchiveValue::Real(*self)
    }

    fn from_archive(value: ArchiveValue, _: &KnownClasses) -> Result<Self, ArchiveError> {
        match value {
            ArchiveValue::Real(r) => Ok(r),
            // whole-number reals are commonly archived as integers
            ArchiveValue::Integer(i) => Ok(i as f64),
            other => Err(ArchiveError::type_mismatch("real", other.kind())),
        }
    }
}

/// Byte blobs. Mutable buffers (`NSMutableData` objects) are accepted and
/// frozen into a plain byte sequence.
impl ArchiveField for Box<[u8]> {
    fn to_archive(&self) -> ArchiveValue {
        ArchiveValue::Data(self.to_vec())
    }

    fn from_archive(value: ArchiveValue, classes: &KnownClasses) -> Result<Self, ArchiveError> {
        match value {
            ArchiveValue::Data(bytes) => Ok(bytes.into_boxed_slice()),
            value @ ArchiveValue::Object(_) => {
                let buffer = decode_nested::<super::MutableData>(value, classes)?;
                Ok(buffer.data.unwrap_or_default())
            }
            other => Err(ArchiveError::type_mismatch("data", other.kind())),
        }
    }
}

impl<T: ArchiveField> ArchiveField for Option<T> {
    fn to_archive(&self) -> ArchiveValue {
        match self {
            Some(value) => value.to_archive(),
            None => ArchiveValue::Null,
        }
    }

    fn from_archive(value: ArchiveValue, classes: &KnownClasses) -> Result<Self, ArchiveError> {
        match value {
            ArchiveValue::Null => Ok(None),
            other => T::from_archive(other, classes).map(Some),
        }
    }
}

impl<T: ArchiveField> ArchiveField for Vec<T> {
    fn to_archive(&self) -> ArchiveValue {
        ArchiveValue::Array(self.iter().map(ArchiveField::to_archive).collect())
    }

    fn from_archive(value: ArchiveValue, classes: &KnownClasses) -> Result<Self, ArchiveError> {
        match value {
            ArchiveValue::Array(items) => items
                .into_iter()
                .map(|item| T::from_archive(item, classes))
                .collect(),
            other => Err(ArchiveError::type_mismatch("array", other.kind())),
        }
    }
}

impl<T: ArchiveField + Ord> ArchiveField for BTreeSet<T> {
    fn to_archive(&self) -> ArchiveValue {
        ArchiveValue::Set(self.iter().map(ArchiveField::to_archive).collect())
    }

    fn from_archive(value: ArchiveValue, classes: &KnownClasses) -> Result<Self, ArchiveError> {
        match value {
            ArchiveValue::Set(items) | ArchiveValue::Array(items) => items
                .into_iter()
                .map(|item| T::from_archive(item, classes))
                .collect(),
            other => Err(ArchiveError::type_mismatch("set", other.kind())),
        }
    }
}

/// Opaque values are passed through untouched.
impl ArchiveField for ArchiveValue {
    fn to_archive(&self) -> ArchiveValue {
        self.clone()
    }

    fn from_archive(value: ArchiveValue, _: &KnownClasses) -> Result<Self, ArchiveError> {
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::{MutableData, Url};

    fn classes() -> KnownClasses {
        KnownClasses::from_iter([Url::CLASS_NAME, MutableData::CLASS_NAME])
    }

    #[test]
    fn test_real_accepts_integer() {
        let value = f64::from_archive(ArchiveValue::Integer(3), &classes()).unwrap();
        assert_eq!(value, 3.0);
    }

    #[test]
    fn test_string_rejects_integer() {
        let err = String::from_archive(ArchiveValue::Integer(3), &classes()).unwrap_err();
        assert!(matches!(
            err,
            ArchiveError::TypeMismatch {
                expected: "string",
                found: "integer",
                ..
            }
        ));
    }

    #[test]
    fn test_option_maps_null_to_none() {
        let value = Option::<String>::from_archive(ArchiveValue::Null, &classes()).unwrap();
        assert_eq!(value, None);
        assert_eq!(Option::<String>::None.to_archive(), ArchiveValue::Null);
    }

    #[test]
    fn test_bytes_coerced_from_mutable_buffer() {
        let buffer = ArchiveValue::Object(
            ArchiveNode::new("NSMutableData")
                .with_field("NSdata", ArchiveValue::Data(b"bookmark".to_vec())),
        );

        let bytes = Box::<[u8]>::from_archive(buffer, &classes()).unwrap();
        assert_eq!(&*bytes, b"bookmark");
    }

    #[test]
    fn test_empty_mutable_buffer_yields_empty_bytes() {
        let buffer = ArchiveValue::Object(ArchiveNode::new("NSMutableData"));

        let bytes = Box::<[u8]>::from_archive(buffer, &classes()).unwrap();
        assert!(bytes.is_empty());
    }

    #[test]
    fn test_nested_unknown_class_is_rejected() {
        let value = ArchiveValue::Object(ArchiveNode::new("NSColor"));

        let err = Url::from_archive(value, &classes()).unwrap_err();
        assert!(matches!(err, ArchiveError::UnknownClass(class) if class == "NSColor"));
    }

    #[test]
    fn test_nested_class_mismatch_is_rejected() {
        let value = ArchiveValue::Object(ArchiveNode::new("NSMutableData"));

        let err = Url::from_archive(value, &classes()).unwrap_err();
        assert!(matches!(
            err,
            ArchiveError::ClassMismatch {
                expected: "NSURL",
                ..
            }
        ));
    }

    #[test]
    fn test_set_accepts_array() {
        let value = ArchiveValue::Array(vec![
            ArchiveValue::String("b".to_string()),
            ArchiveValue::String("a".to_string()),
        ]);

        let set = BTreeSet::<String>::from_archive(value, &classes()).unwrap();
        assert_eq!(
            set.into_iter().collect::<Vec<_>>(),
            vec!["a".to_string(), "b".to_string()]
        );
    }

    #[test]
    fn test_field_error_names_class_and_field() {
        let node = ArchiveNode::new("NSURL").with_field("NSrelative", ArchiveValue::Integer(1));

        let err = Url::decode(node, &classes()).unwrap_err();
        match err {
            ArchiveError::TypeMismatch { field, .. } => assert_eq!(field, "NSURL.NSrelative"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
