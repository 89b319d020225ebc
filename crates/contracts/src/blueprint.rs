//! PipelineBlueprint - Config Loader output
//!
//! Describes the routing stages of one process: the property table server
//! names are resolved from, the load-balanced dispatch stages, and the
//! fan-out (splitting) stages with their destinations.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::CacheKey;

/// Configuration version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete routing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineBlueprint {
    /// Configuration version
    #[serde(default)]
    pub version: ConfigVersion,

    /// Property table consulted for server names
    #[serde(default)]
    pub properties: Vec<PropertyEntry>,

    /// Load-balanced dispatch stages
    #[serde(default)]
    pub dispatchers: Vec<DispatcherConfig>,

    /// Fan-out stages
    #[serde(default)]
    pub splitters: Vec<SplitterConfig>,
}

impl PipelineBlueprint {
    /// Find a dispatch stage by name
    pub fn dispatcher(&self, name: &str) -> Option<&DispatcherConfig> {
        self.dispatchers.iter().find(|d| d.name == name)
    }

    /// Find a fan-out stage by name
    pub fn splitter(&self, name: &str) -> Option<&SplitterConfig> {
        self.splitters.iter().find(|s| s.name == name)
    }
}

/// One persisted property value
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyEntry {
    pub key: String,
    pub property_type: String,
    pub name: String,
    pub value: String,
}

/// Load-balanced dispatch stage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatcherConfig {
    /// Stage name
    pub name: String,

    /// Property key holding the server names
    pub server_name_key: String,

    /// Property type prefix of the server name entries
    pub server_name_type_prefix: String,

    /// How long a failed server is skipped before it is tried again (ms)
    pub down_server_retry_time_ms: u64,

    /// Per-endpoint call timeout (ms)
    #[serde(default = "default_call_timeout_ms")]
    pub call_timeout_ms: u64,

    /// Where the request header is read from
    #[serde(default = "default_header_location")]
    pub header_location: String,

    /// Where the request body is read from
    #[serde(default = "default_message_location")]
    pub message_location: String,
}

impl DispatcherConfig {
    /// Cache key shared by every stage configured for the same pool
    pub fn cache_key(&self) -> CacheKey {
        CacheKey::new(&self.server_name_key, &self.server_name_type_prefix)
    }

    /// Re-admission interval
    pub fn retry_interval(&self) -> Duration {
        Duration::from_millis(self.down_server_retry_time_ms)
    }

    /// Per-endpoint timeout
    pub fn call_timeout(&self) -> Duration {
        Duration::from_millis(self.call_timeout_ms)
    }
}

fn default_call_timeout_ms() -> u64 {
    30_000
}

fn default_header_location() -> String {
    "@context.REQUEST_HEADER".to_string()
}

fn default_message_location() -> String {
    "INPUT_MESSAGE".to_string()
}

/// Fan-out stage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitterConfig {
    /// Stage name
    pub name: String,

    /// Next stages, in delivery order
    #[serde(default)]
    pub destinations: Vec<String>,

    /// Decomposition mode
    pub mode: SplitMode,
}

/// How a batch payload is decomposed into units
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SplitMode {
    /// Delimiter-separated field lists tokenized in lockstep
    FieldList(FieldListConfig),
    /// Immediate children of a container node
    ChildNodes(ChildNodesConfig),
}

impl SplitMode {
    /// Short label (used for logging/metrics)
    pub fn label(&self) -> &'static str {
        match self {
            Self::FieldList(_) => "field_list",
            Self::ChildNodes(_) => "child_nodes",
        }
    }
}

/// Field-list decomposition settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldListConfig {
    /// Path of the primary list (e.g. telephone numbers)
    pub primary_path: String,

    /// Path of the optional correlation-key list
    #[serde(default)]
    pub correlation_path: Option<String>,

    /// Where a range token's start value is written
    pub range_start_path: String,

    /// Where a range token's end-station suffix is written
    pub range_end_path: String,

    /// Token separator characters
    #[serde(default = "default_delimiter")]
    pub delimiter: String,

    /// Value carried by the sentinel unit and by missing correlation keys
    #[serde(default = "default_placeholder")]
    pub placeholder: String,
}

fn default_delimiter() -> String {
    ";".to_string()
}

fn default_placeholder() -> String {
    "false".to_string()
}

/// Child-node (batch) decomposition settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildNodesConfig {
    /// Path of the node whose immediate children become units
    pub container_path: String,

    /// Root element name of each unit message (`"."` = child's own name)
    pub output_root: String,

    /// Where the child is placed inside the unit message
    #[serde(default)]
    pub output_base_path: String,

    /// Order in which children map to unit indices
    #[serde(default)]
    pub child_order: ChildOrder,
}

/// Mapping of children to unit indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChildOrder {
    /// Last child becomes unit 0
    #[default]
    Reversed,
    /// First child becomes unit 0
    Document,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatcher_defaults() {
        let json = r#"{
            "name": "npac_client",
            "server_name_key": "SOA_GATEWAY",
            "server_name_type_prefix": "NPAC_SERVER",
            "down_server_retry_time_ms": 1500
        }"#;
        let cfg: DispatcherConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.header_location, "@context.REQUEST_HEADER");
        assert_eq!(cfg.message_location, "INPUT_MESSAGE");
        assert_eq!(cfg.retry_interval(), Duration::from_millis(1500));
        assert_eq!(cfg.cache_key(), CacheKey::new("SOA_GATEWAY", "NPAC_SERVER"));
    }

    #[test]
    fn test_split_mode_tagging() {
        let json = r#"{
            "kind": "child_nodes",
            "container_path": "Batch.Orders",
            "output_root": "."
        }"#;
        let mode: SplitMode = serde_json::from_str(json).unwrap();
        match mode {
            SplitMode::ChildNodes(cfg) => {
                assert_eq!(cfg.child_order, ChildOrder::Reversed);
                assert!(cfg.output_base_path.is_empty());
            }
            other => panic!("unexpected mode {other:?}"),
        }
    }

    #[test]
    fn test_field_list_defaults() {
        let json = r#"{
            "kind": "field_list",
            "primary_path": "A.Tn",
            "range_start_path": "A.TnRange.Tn",
            "range_end_path": "A.TnRange.EndStation"
        }"#;
        let mode: SplitMode = serde_json::from_str(json).unwrap();
        let SplitMode::FieldList(cfg) = mode else {
            panic!("expected field list");
        };
        assert_eq!(cfg.delimiter, ";");
        assert_eq!(cfg.placeholder, "false");
        assert!(cfg.correlation_path.is_none());
    }
}
