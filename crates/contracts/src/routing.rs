//! Routing data model shared by the dispatch and fan-out stages.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::{Document, Node};

/// Identifies one configuration scope of a backend pool.
///
/// Two dispatch stages configured with the same key share one client, and
/// therefore one round-robin cursor and one health view.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CacheKey {
    /// Property key under which server names are stored
    pub server_name_key: String,
    /// Property type prefix of the server name entries
    pub property_type_prefix: String,
}

impl CacheKey {
    pub fn new(server_name_key: impl Into<String>, property_type_prefix: impl Into<String>) -> Self {
        Self {
            server_name_key: server_name_key.into(),
            property_type_prefix: property_type_prefix.into(),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.server_name_key, self.property_type_prefix)
    }
}

/// One decomposed element of a batch payload.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SplitUnit {
    /// Position in the decomposition (0 may be the sentinel)
    pub index: usize,

    /// Field values of this unit, keyed by document path
    pub fields: BTreeMap<String, String>,

    /// Whole element carried by this unit (child-node decomposition)
    pub node: Option<Node>,

    /// Placeholder unit emitted ahead of the real data units
    pub sentinel: bool,
}

impl SplitUnit {
    /// Create a data unit
    pub fn new(index: usize) -> Self {
        Self {
            index,
            ..Self::default()
        }
    }

    /// Create the leading placeholder unit
    pub fn sentinel() -> Self {
        Self {
            sentinel: true,
            ..Self::default()
        }
    }

    /// Whether this is the placeholder unit downstream stages must special-case
    pub fn is_sentinel(&self) -> bool {
        self.sentinel
    }

    /// Builder: set one field
    pub fn with_field(mut self, path: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(path.into(), value.into());
        self
    }

    /// Field value by path
    pub fn field(&self, path: &str) -> Option<&str> {
        self.fields.get(path).map(String::as_str)
    }
}

/// "Deliver this payload to this named next stage"
///
/// All entries built from one unit share the same payload allocation;
/// consumers that need to modify it must clone first.
#[derive(Debug, Clone)]
pub struct RouteEntry {
    /// Name of the next stage
    pub destination: String,
    /// Unit message
    pub payload: Arc<Document>,
}

impl RouteEntry {
    pub fn new(destination: impl Into<String>, payload: Arc<Document>) -> Self {
        Self {
            destination: destination.into(),
            payload,
        }
    }

    /// Whether two entries carry the very same payload instance
    pub fn shares_payload_with(&self, other: &RouteEntry) -> bool {
        Arc::ptr_eq(&self.payload, &other.payload)
    }
}
