//! In-memory property table
//!
//! Backs [`PropertySource`] with the `[[properties]]` entries of a
//! blueprint, or with entries inserted directly by tests.

use std::collections::HashMap;

use contracts::{PropertyEntry, PropertySource};
use tracing::debug;

/// `(key, property_type, name) -> value` lookup table
#[derive(Debug, Clone, Default)]
pub struct PropertyStore {
    values: HashMap<(String, String, String), String>,
}

impl PropertyStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from blueprint entries
    ///
    /// Later entries override earlier ones with the same address.
    pub fn from_entries(entries: &[PropertyEntry]) -> Self {
        let mut store = Self::new();
        for entry in entries {
            store.insert(&entry.key, &entry.property_type, &entry.name, &entry.value);
        }
        store
    }

    /// Insert or replace one property
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        property_type: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<String>,
    ) {
        self.values.insert(
            (key.into(), property_type.into(), name.into()),
            value.into(),
        );
    }

    /// Builder: insert one property
    pub fn with(
        mut self,
        key: &str,
        property_type: &str,
        name: &str,
        value: &str,
    ) -> Self {
        self.insert(key, property_type, name, value);
        self
    }

    /// Number of stored properties
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl PropertySource for PropertyStore {
    fn property(&self, key: &str, property_type: &str, name: &str) -> Option<String> {
        let value = self
            .values
            .get(&(key.to_string(), property_type.to_string(), name.to_string()))
            .cloned();
        if value.is_none() {
            debug!(key, property_type, name, "Property not found");
        }
        value
    }
}
