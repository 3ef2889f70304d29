use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use super::descriptors::TypeDescriptor;
use super::operations::OperationDescriptor;

/// The closed model handed from the core to every emitter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpecMetadata {
    pub info: SpecInfo,
    /// Prefix for generated top-level symbols (`x-name-prefix`), possibly empty.
    pub name_prefix: String,
    pub operations: Vec<OperationDescriptor>,
    /// Registry snapshot: reference key to descriptor, in registration order.
    pub refs: IndexMap<String, TypeDescriptor>,
}

impl SpecMetadata {
    /// Follow `Reference` edges until a structural or primitive descriptor.
    pub fn resolve<'a>(&'a self, descriptor: &'a TypeDescriptor) -> Option<&'a TypeDescriptor> {
        let mut current = descriptor;
        for _ in 0..=self.refs.len() {
            match current {
                TypeDescriptor::Reference(key) => current = self.refs.get(key)?,
                other => return Some(other),
            }
        }
        None
    }

    /// Generated class name a descriptor is known by, following references.
    pub fn class_name_of<'a>(&'a self, descriptor: &'a TypeDescriptor) -> Option<&'a str> {
        self.resolve(descriptor).and_then(TypeDescriptor::class_name)
    }
}

/// Document metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpecInfo {
    pub title: String,
    pub version: String,
}

/// A document name together with the casings generated code uses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct NormalizedName {
    pub original: String,
    /// Type-level spelling, e.g. `ShowPetById`.
    pub pascal_case: String,
    /// Function-level spelling, e.g. `show_pet_by_id`.
    pub snake_case: String,
}

impl fmt::Display for NormalizedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.original)
    }
}
