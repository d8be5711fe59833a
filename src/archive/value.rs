//! Generic keyed object-graph representation.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Reserved key carrying the class tag of an archived object.
pub const CLASS_KEY: &str = "$class";

/// Two-letter namespace prefix of Foundation-style field names.
pub const NAMESPACE_PREFIX: &str = "NS";

/// A value stored under one key of an [`ArchiveNode`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ArchiveValue {
    Null,
    Bool(bool),
    Integer(i64),
    Real(f64),
    String(String),
    Data(Vec<u8>),
    Array(Vec<ArchiveValue>),
    Set(Vec<ArchiveValue>),
    Object(ArchiveNode),
}

impl ArchiveValue {
    /// Short name of the value shape, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            ArchiveValue::Null => "null",
            ArchiveValue::Bool(_) => "bool",
            ArchiveValue::Integer(_) => "integer",
            ArchiveValue::Real(_) => "real",
            ArchiveValue::String(_) => "string",
            ArchiveValue::Data(_) => "data",
            ArchiveValue::Array(_) => "array",
            ArchiveValue::Set(_) => "set",
            ArchiveValue::Object(_) => "object",
        }
    }
}

/// An archived object: a class tag plus its keyed fields.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArchiveNode {
    #[serde(rename = "$class")]
    pub class: String,
    #[serde(flatten)]
    pub fields: BTreeMap<String, ArchiveValue>,
}

impl ArchiveNode {
    pub fn new<S: Into<String>>(class: S) -> Self {
        ArchiveNode {
            class: class.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Stores `value` under the archive key of the declared field `field`.
    pub fn insert_field(&mut self, field: &str, value: ArchiveValue) {
        self.fields.insert(archive_key(field).into_owned(), value);
    }

    /// Removes and returns the value archived for the declared field `field`.
    pub fn take_field(&mut self, field: &str) -> Option<ArchiveValue> {
        self.fields.remove(&*archive_key(field))
    }

    /// Builder-style variant of [`ArchiveNode::insert_field`].
    pub fn with_field(mut self, field: &str, value: ArchiveValue) -> Self {
        self.insert_field(field, value);
        self
    }
}

/// Maps a declared field name to the key it is archived under.
///
/// `NSrelative` is archived as `NS.relative`; every other name is unchanged.
pub fn archive_key(field: &str) -> Cow<'_, str> {
    match field.strip_prefix(NAMESPACE_PREFIX) {
        Some(rest) => Cow::Owned(format!("{}.{}", NAMESPACE_PREFIX, rest)),
        None => Cow::Borrowed(field),
    }
}

/// Inverse of [`archive_key`].
pub fn field_name(key: &str) -> Cow<'_, str> {
    match key
        .strip_prefix(NAMESPACE_PREFIX)
        .and_then(|rest| rest.strip_prefix('.'))
    {
        Some(rest) => Cow::Owned(format!("{}{}", NAMESPACE_PREFIX, rest)),
        None => Cow::Borrowed(key),
    }
}

/// Returns the keys of `node` that no declared field in `fields` maps to.
///
/// The reserved [`CLASS_KEY`] is never reported.
pub fn undeclared_keys(node: &ArchiveNode, fields: &[&str]) -> Vec<String> {
    node.fields
        .keys()
        .filter(|key| key.as_str() != CLASS_KEY)
        .filter(|key| {
            let name = field_name(key);
            !(fields.contains(&&*name) && archive_key(&name) == key.as_str())
        })
        .cloned()
        .collect()
}
