//! Lookup table from schema name to message descriptor

use crate::descriptor::MessageDescriptor;
use crate::error::DescriptorError;
use crate::message::Message;
use std::collections::BTreeMap;

/// Descriptors of a set of message types, keyed by schema name.
///
/// Each generated message owns its descriptor as a lazily initialized
/// singleton; a registry only borrows those singletons, so it is cheap to
/// build wherever reflection by name is needed.
///
/// ```ignore
/// let mut registry = DescriptorRegistry::new();
/// registry.register::<Point>()?.register::<User>()?;
///
/// let fields: Vec<_> = registry.get("Point").unwrap().field_names().collect();
/// assert_eq!(fields, ["x", "y"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DescriptorRegistry {
    by_name: BTreeMap<&'static str, &'static MessageDescriptor>,
}

impl DescriptorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the descriptor of `M`
    pub fn register<M: Message>(&mut self) -> Result<&mut Self, DescriptorError> {
        self.insert(M::descriptor())
    }

    /// Add a descriptor, rejecting a second one with the same schema name
    pub fn insert(
        &mut self,
        descriptor: &'static MessageDescriptor,
    ) -> Result<&mut Self, DescriptorError> {
        let name = descriptor.schema_name();
        if self.by_name.contains_key(name) {
            return Err(DescriptorError::DuplicateSchema(name.to_string()));
        }
        self.by_name.insert(name, descriptor);
        Ok(self)
    }

    pub fn get(&self, schema_name: &str) -> Option<&'static MessageDescriptor> {
        self.by_name.get(schema_name).copied()
    }

    pub fn contains(&self, schema_name: &str) -> bool {
        self.by_name.contains_key(schema_name)
    }

    /// Registered schema names in sorted order
    pub fn schema_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.by_name.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}
