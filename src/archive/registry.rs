//! Class tag → record type mapping.

use super::error::ArchiveError;
use super::field::Archivable;
use super::value::ArchiveNode;
use std::collections::{HashMap, HashSet};

/// The set of class tags a registry accepts, consulted for nested objects.
#[derive(Debug, Default, Clone)]
pub struct KnownClasses(HashSet<&'static str>);

impl KnownClasses {
    pub fn contains(&self, class: &str) -> bool {
        self.0.contains(class)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<&'static str> for KnownClasses {
    fn from_iter<I: IntoIterator<Item = &'static str>>(iter: I) -> Self {
        KnownClasses(iter.into_iter().collect())
    }
}

pub type RecordDecoder<R> = fn(ArchiveNode, &KnownClasses) -> Result<R, ArchiveError>;

fn decode_as<T, R>(node: ArchiveNode, classes: &KnownClasses) -> Result<R, ArchiveError>
where
    T: Archivable,
    R: From<T>,
{
    T::decode(node, classes).map(R::from)
}

/// Immutable mapping from class tags to decoders producing `R`.
///
/// Built once through [`ClassRegistryBuilder`] and shared by reference with
/// every decode call.
pub struct ClassRegistry<R> {
    classes: KnownClasses,
    decoders: HashMap<&'static str, RecordDecoder<R>>,
}

impl<R> ClassRegistry<R> {
    pub fn builder() -> ClassRegistryBuilder<R> {
        ClassRegistryBuilder {
            decoders: HashMap::new(),
        }
    }

    pub fn classes(&self) -> &KnownClasses {
        &self.classes
    }

    /// Decodes `node` into the record type registered for its class tag.
    pub fn decode(&self, node: ArchiveNode) -> Result<R, ArchiveError> {
        match self.decoders.get(node.class.as_str()) {
            Some(decoder) => decoder(node, &self.classes),
            None => Err(ArchiveError::UnknownClass(node.class)),
        }
    }
}

pub struct ClassRegistryBuilder<R> {
    decoders: HashMap<&'static str, RecordDecoder<R>>,
}

impl<R> ClassRegistryBuilder<R> {
    pub fn register<T>(mut self) -> Self
    where
        T: Archivable,
        R: From<T>,
    {
        self.decoders.insert(T::CLASS_NAME, decode_as::<T, R>);
        self
    }

    pub fn build(self) -> ClassRegistry<R> {
        ClassRegistry {
            classes: self.decoders.keys().copied().collect(),
            decoders: self.decoders,
        }
    }
}
