//! Error types for CLI operations.

use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Stage name not present in the configuration
    #[error("No {kind} stage named '{name}' in configuration")]
    UnknownStage { kind: &'static str, name: String },

    /// Payload file could not be read or parsed
    #[error("Failed to read payload {path}: {message}")]
    Payload { path: String, message: String },

    /// Some requests of a send run failed
    #[error("{failed} of {total} requests failed")]
    SendFailed { failed: u64, total: u64 },
}

impl CliError {
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    pub fn unknown_dispatcher(name: impl Into<String>) -> Self {
        Self::UnknownStage {
            kind: "dispatch",
            name: name.into(),
        }
    }

    pub fn unknown_splitter(name: impl Into<String>) -> Self {
        Self::UnknownStage {
            kind: "fan-out",
            name: name.into(),
        }
    }

    pub fn payload(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Payload {
            path: path.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            CliError::unknown_splitter("batch").to_string(),
            "No fan-out stage named 'batch' in configuration"
        );
        assert_eq!(
            CliError::SendFailed { failed: 1, total: 3 }.to_string(),
            "1 of 3 requests failed"
        );
    }
}
