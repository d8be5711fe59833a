//! Foundation value classes embedded in application records.

use super::Archivable;
use serde::Serialize;

#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Url {
    pub relative: String,
    pub base: Option<String>,
}

crate::archived_record!(Url, "NSURL", {
    relative => "NSrelative",
    base => "NSbase",
});

impl Archivable for Url {}

/// A mutable byte buffer. Record fields never keep one of these; see the
/// `Box<[u8]>` field conversion.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MutableData {
    pub data: Option<Box<[u8]>>,
}

crate::archived_record!(MutableData, "NSMutableData", {
    data => "NSdata",
});

impl Archivable for MutableData {}
