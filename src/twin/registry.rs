//! Property registry: the static table of synchronised properties.
//!
//! Populated once at startup; afterwards only the value slots change.
//! Registration order is preserved and is the order in which reconciliation
//! and hardware initialisation visit the properties.

use log::debug;

use crate::error::RegistryError;

use super::property::{PropertyDescriptor, PropertyValue};

#[derive(Debug, Default)]
pub struct PropertyRegistry {
    entries: Vec<PropertyDescriptor>,
}

impl PropertyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a descriptor.  Duplicate keys and hardware bindings on kinds
    /// without a logical level are configuration errors.
    pub fn register(&mut self, descriptor: PropertyDescriptor) -> Result<(), RegistryError> {
        let key = descriptor.key();
        if self.find(key).is_some() {
            return Err(RegistryError::DuplicateKey(key));
        }
        if descriptor.binding().is_some() && descriptor.value().as_logical().is_none() {
            return Err(RegistryError::UnsupportedBinding(key));
        }
        debug!("registry: {} ({:?})", key, descriptor.kind());
        self.entries.push(descriptor);
        Ok(())
    }

    pub fn find(&self, key: &str) -> Option<&PropertyDescriptor> {
        self.entries.iter().find(|d| d.key() == key)
    }

    /// Visit every descriptor in registration order.
    pub fn for_each(&self, mut visitor: impl FnMut(&PropertyDescriptor)) {
        self.entries.iter().for_each(|d| visitor(d));
    }

    pub fn iter(&self) -> impl Iterator<Item = &PropertyDescriptor> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Replace a slot value.  `None` if the key is unknown, `Some(false)`
    /// if the value is of the wrong kind.
    pub(crate) fn store(&mut self, key: &str, value: PropertyValue) -> Option<bool> {
        self.entries
            .iter_mut()
            .find(|d| d.key() == key)
            .map(|d| d.store(value))
    }
}
