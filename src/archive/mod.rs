//! Mapping between typed records and keyed object-graph archives.
//!
//! A record type declares its field table with [`archived_record!`]. Encoding
//! writes every declared field under its archive key; decoding refuses any
//! archive carrying keys the table does not declare, so schema drift in the
//! source application surfaces as an error instead of lost data.

mod codec;
mod error;
mod field;
mod foundation;
mod registry;
mod value;

pub use codec::{Archiver, JsonGraphCodec, ObjectGraphCodec};
pub use error::ArchiveError;
pub use field::{decode_nested, Archivable, ArchiveField, FieldReader, FieldTable};
pub use foundation::{MutableData, Url};
pub use registry::{ClassRegistry, ClassRegistryBuilder, KnownClasses, RecordDecoder};
pub use value::{
    archive_key, field_name, undeclared_keys, ArchiveNode, ArchiveValue, CLASS_KEY,
    NAMESPACE_PREFIX,
};
