use indexmap::IndexMap;

use crate::ir::TypeDescriptor;

/// Run-scoped store of named descriptors keyed by reference string.
///
/// Append-only: a key keeps the first descriptor recorded for it.
#[derive(Debug, Default)]
pub struct ReferenceRegistry {
    refs: IndexMap<String, TypeDescriptor>,
}

impl ReferenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `descriptor` under `key`. Returns `false` when the key was
    /// already present, in which case the existing entry is kept.
    pub fn add_ref(&mut self, key: impl Into<String>, descriptor: TypeDescriptor) -> bool {
        let key = key.into();
        if self.refs.contains_key(&key) {
            return false;
        }
        log::debug!("registered {key}");
        self.refs.insert(key, descriptor);
        true
    }

    pub fn contains(&self, key: &str) -> bool {
        self.refs.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&TypeDescriptor> {
        self.refs.get(key)
    }

    /// Class name of a descriptor, following a reference into the registry.
    pub fn class_name_of<'r>(&'r self, descriptor: &'r TypeDescriptor) -> Option<&'r str> {
        match descriptor {
            TypeDescriptor::Reference(key) => self.get(key).and_then(TypeDescriptor::class_name),
            other => other.class_name(),
        }
    }

    pub fn len(&self) -> usize {
        self.refs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }

    /// Consume the registry into its snapshot, in insertion order.
    pub fn build(self) -> IndexMap<String, TypeDescriptor> {
        self.refs
    }
}
