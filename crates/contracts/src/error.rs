//! Layered error definitions
//!
//! Categorized by source: config / validation / dispatch / transport

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    /// Missing or invalid setup (no endpoints, no destinations, bad field)
    #[error("configuration error in '{scope}': {message}")]
    Configuration { scope: String, message: String },

    // ===== Payload Errors =====
    /// Malformed input payload
    #[error("validation error at '{field}': {message}")]
    Validation { field: String, message: String },

    // ===== Dispatch Errors =====
    /// Every endpoint of the pool was excluded or failed during one call
    #[error(
        "none of the following servers were available to service the request: {endpoints:?} \
         (attempted {attempts}){}",
        describe_last(.last_error)
    )]
    Dispatch {
        endpoints: Vec<String>,
        attempts: usize,
        #[source]
        last_error: Option<TransportError>,
    },

    /// The backend processed the request and refused it
    #[error("server '{endpoint}' rejected the request: {reason}")]
    Rejected { endpoint: String, reason: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create configuration error
    pub fn configuration(scope: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Configuration {
            scope: scope.into(),
            message: message.into(),
        }
    }

    /// Create payload validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Whether this error is fatal at stage initialization
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::Configuration { .. } | Self::ConfigParse { .. } | Self::ConfigValidation { .. }
        )
    }
}

fn describe_last(last_error: &Option<TransportError>) -> String {
    last_error
        .as_ref()
        .map(|e| format!(", last error: {e}"))
        .unwrap_or_default()
}

/// Per-endpoint failure reported by a [`crate::BackendTransport`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Endpoint could not be located or connected to
    #[error("server '{endpoint}' unreachable: {message}")]
    Unreachable { endpoint: String, message: String },

    /// Call did not complete within the per-endpoint timeout
    #[error("server '{endpoint}' timed out after {timeout_ms}ms")]
    Timeout { endpoint: String, timeout_ms: u64 },

    /// Backend answered with a refusal (invalid data, processing error)
    #[error("server '{endpoint}' rejected the request: {reason}")]
    Rejected { endpoint: String, reason: String },
}

impl TransportError {
    /// Create unreachable error
    pub fn unreachable(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Unreachable {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    /// Create rejection error
    pub fn rejected(endpoint: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Rejected {
            endpoint: endpoint.into(),
            reason: reason.into(),
        }
    }

    /// Endpoint the failure belongs to
    pub fn endpoint(&self) -> &str {
        match self {
            Self::Unreachable { endpoint, .. }
            | Self::Timeout { endpoint, .. }
            | Self::Rejected { endpoint, .. } => endpoint,
        }
    }

    /// Whether the next endpoint should be tried
    ///
    /// A rejection is the backend's answer to the request, so it is
    /// surfaced as-is instead of failing over.
    pub fn triggers_failover(&self) -> bool {
        !matches!(self, Self::Rejected { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_error_mentions_last_failure() {
        let err = ContractError::Dispatch {
            endpoints: vec!["a".into(), "b".into()],
            attempts: 2,
            last_error: Some(TransportError::unreachable("b", "connection refused")),
        };
        let text = err.to_string();
        assert!(text.contains("[\"a\", \"b\"]"));
        assert!(text.contains("connection refused"));
    }

    #[test]
    fn test_dispatch_error_without_attempt() {
        let err = ContractError::Dispatch {
            endpoints: vec!["a".into()],
            attempts: 0,
            last_error: None,
        };
        assert!(!err.to_string().contains("last error"));
    }

    #[test]
    fn test_failover_classification() {
        assert!(TransportError::unreachable("a", "x").triggers_failover());
        assert!(TransportError::Timeout {
            endpoint: "a".into(),
            timeout_ms: 10
        }
        .triggers_failover());
        assert!(!TransportError::rejected("a", "bad tn").triggers_failover());
    }

    #[test]
    fn test_configuration_classification() {
        assert!(ContractError::configuration("splitter", "no destinations").is_configuration());
        assert!(!ContractError::validation("Tn", "bad").is_configuration());
    }
}
