//! Configuration validation
//!
//! Rules:
//! - dispatcher and splitter names are non-empty and unique
//! - server name key / type prefix are non-empty
//! - call_timeout_ms > 0
//! - every splitter has at least one destination
//! - split mode paths and delimiter are non-empty
//!
//! A splitter without destinations is a `Configuration` error: it is the
//! same failure the stage would raise at startup, reported at load time.

use std::collections::HashSet;

use contracts::{ContractError, PipelineBlueprint, SplitMode, SplitterConfig};

/// Validate a PipelineBlueprint
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(blueprint: &PipelineBlueprint) -> Result<(), ContractError> {
    validate_properties(blueprint)?;
    validate_dispatchers(blueprint)?;
    validate_splitters(blueprint)?;
    Ok(())
}

fn validate_properties(blueprint: &PipelineBlueprint) -> Result<(), ContractError> {
    for (idx, prop) in blueprint.properties.iter().enumerate() {
        if prop.key.is_empty() || prop.property_type.is_empty() || prop.name.is_empty() {
            return Err(ContractError::config_validation(
                format!("properties[{idx}]"),
                "key, property_type and name cannot be empty",
            ));
        }
    }
    Ok(())
}

fn validate_dispatchers(blueprint: &PipelineBlueprint) -> Result<(), ContractError> {
    let mut seen = HashSet::new();
    for (idx, dispatcher) in blueprint.dispatchers.iter().enumerate() {
        if dispatcher.name.is_empty() {
            return Err(ContractError::config_validation(
                format!("dispatchers[{idx}].name"),
                "dispatcher name cannot be empty",
            ));
        }
        if !seen.insert(&dispatcher.name) {
            return Err(ContractError::config_validation(
                format!("dispatchers[name={}]", dispatcher.name),
                "duplicate dispatcher name",
            ));
        }
        if dispatcher.server_name_key.is_empty() {
            return Err(ContractError::config_validation(
                format!("dispatchers[{}].server_name_key", dispatcher.name),
                "server_name_key cannot be empty",
            ));
        }
        if dispatcher.server_name_type_prefix.is_empty() {
            return Err(ContractError::config_validation(
                format!("dispatchers[{}].server_name_type_prefix", dispatcher.name),
                "server_name_type_prefix cannot be empty",
            ));
        }
        if dispatcher.call_timeout_ms == 0 {
            return Err(ContractError::config_validation(
                format!("dispatchers[{}].call_timeout_ms", dispatcher.name),
                "call_timeout_ms must be > 0",
            ));
        }
    }
    Ok(())
}

fn validate_splitters(blueprint: &PipelineBlueprint) -> Result<(), ContractError> {
    let mut seen = HashSet::new();
    for (idx, splitter) in blueprint.splitters.iter().enumerate() {
        if splitter.name.is_empty() {
            return Err(ContractError::config_validation(
                format!("splitters[{idx}].name"),
                "splitter name cannot be empty",
            ));
        }
        if !seen.insert(&splitter.name) {
            return Err(ContractError::config_validation(
                format!("splitters[name={}]", splitter.name),
                "duplicate splitter name",
            ));
        }
        if splitter.destinations.is_empty() {
            return Err(ContractError::configuration(
                format!("splitters[{}].destinations", splitter.name),
                "no next processors configured",
            ));
        }
        validate_mode(splitter)?;
    }
    Ok(())
}

fn validate_mode(splitter: &SplitterConfig) -> Result<(), ContractError> {
    let field = |name: &str| format!("splitters[{}].mode.{name}", splitter.name);
    match &splitter.mode {
        SplitMode::FieldList(cfg) => {
            let required = [
                ("primary_path", &cfg.primary_path),
                ("range_start_path", &cfg.range_start_path),
                ("range_end_path", &cfg.range_end_path),
                ("delimiter", &cfg.delimiter),
            ];
            for (name, value) in required {
                if value.is_empty() {
                    return Err(ContractError::config_validation(
                        field(name),
                        format!("{name} cannot be empty"),
                    ));
                }
            }
            if cfg.correlation_path.as_deref() == Some("") {
                return Err(ContractError::config_validation(
                    field("correlation_path"),
                    "correlation_path cannot be empty when set",
                ));
            }
        }
        SplitMode::ChildNodes(cfg) => {
            if cfg.container_path.is_empty() {
                return Err(ContractError::config_validation(
                    field("container_path"),
                    "container_path cannot be empty",
                ));
            }
            if cfg.output_root.is_empty() {
                return Err(ContractError::config_validation(
                    field("output_root"),
                    "output_root cannot be empty",
                ));
            }
        }
    }
    Ok(())
}
