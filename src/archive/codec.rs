//! Byte-level codec boundary and the archiver built on top of it.

use super::error::ArchiveError;
use super::field::Archivable;
use super::registry::ClassRegistry;
use super::value::ArchiveNode;

/// Turns archive nodes into bytes and back.
///
/// Implementations own the wire format only; which keys a node may carry is
/// decided by the record field tables.
pub trait ObjectGraphCodec {
    fn archive(&self, node: &ArchiveNode) -> Result<Vec<u8>, ArchiveError>;

    fn unarchive(&self, bytes: &[u8]) -> Result<ArchiveNode, ArchiveError>;
}

/// Stores archive nodes as JSON documents.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonGraphCodec;

impl ObjectGraphCodec for JsonGraphCodec {
    fn archive(&self, node: &ArchiveNode) -> Result<Vec<u8>, ArchiveError> {
        serde_json::to_vec(node).map_err(|e| ArchiveError::Codec(e.to_string()))
    }

    fn unarchive(&self, bytes: &[u8]) -> Result<ArchiveNode, ArchiveError> {
        serde_json::from_slice(bytes).map_err(|e| ArchiveError::Codec(e.to_string()))
    }
}

/// Archives typed records to bytes and unarchives bytes into `R`, the sum of
/// every record type registered in the class registry.
pub struct Archiver<R> {
    registry: ClassRegistry<R>,
    codec: Box<dyn ObjectGraphCodec>,
}

impl<R> Archiver<R> {
    pub fn new<C: ObjectGraphCodec + 'static>(registry: ClassRegistry<R>, codec: C) -> Self {
        Archiver {
            registry,
            codec: Box::new(codec),
        }
    }

    pub fn archive<T: Archivable>(&self, record: &T) -> Result<Vec<u8>, ArchiveError> {
        self.codec.archive(&record.encode())
    }

    pub fn unarchive(&self, bytes: &[u8]) -> Result<R, ArchiveError> {
        let node = self.codec.unarchive(bytes)?;
        self.registry.decode(node)
    }
}
