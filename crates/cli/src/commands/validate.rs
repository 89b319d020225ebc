//! `validate` command implementation.

use anyhow::{Context, Result};
use contracts::PipelineBlueprint;
use dispatch::ServerRegistry;
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    version: String,
    property_count: usize,
    dispatcher_count: usize,
    splitter_count: usize,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", args.config.display())),
            warnings: None,
            summary: None,
        };
    }

    match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(blueprint) => {
            let warnings = collect_warnings(&blueprint);
            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(ConfigSummary {
                    version: format!("{:?}", blueprint.version),
                    property_count: blueprint.properties.len(),
                    dispatcher_count: blueprint.dispatchers.len(),
                    splitter_count: blueprint.splitters.len(),
                }),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(blueprint: &PipelineBlueprint) -> Vec<String> {
    let mut warnings = Vec::new();
    let store = config_loader::ConfigLoader::property_store(blueprint);

    if blueprint.dispatchers.is_empty() && blueprint.splitters.is_empty() {
        warnings.push("No dispatch or fan-out stages configured".to_string());
    }

    // Pools without servers only fail when the stage starts
    for dispatcher in &blueprint.dispatchers {
        if let Err(e) = ServerRegistry::resolve(
            &store,
            &dispatcher.server_name_key,
            &dispatcher.server_name_type_prefix,
        ) {
            warnings.push(format!("Dispatcher '{}': {}", dispatcher.name, e));
        }
        if dispatcher.down_server_retry_time_ms == 0 {
            warnings.push(format!(
                "Dispatcher '{}' re-admits failed servers immediately",
                dispatcher.name
            ));
        }
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Version: {}", summary.version);
            println!("  Properties: {}", summary.property_count);
            println!("  Dispatchers: {}", summary.dispatcher_count);
            println!("  Splitters: {}", summary.splitter_count);
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config_loader::{ConfigFormat, ConfigLoader};
    use std::io::Write;

    const CONFIG: &str = r#"
[[properties]]
key = "SOA_GATEWAY"
property_type = "NPAC_SERVER_0"
name = "SERVER_NAME"
value = "127.0.0.1:7001"

[[dispatchers]]
name = "npac_client"
server_name_key = "SOA_GATEWAY"
server_name_type_prefix = "NPAC_SERVER"
down_server_retry_time_ms = 0

[[dispatchers]]
name = "orphan"
server_name_key = "NOWHERE"
server_name_type_prefix = "NONE"
down_server_retry_time_ms = 1000
"#;

    #[test]
    fn test_warnings() {
        let blueprint = ConfigLoader::load_from_str(CONFIG, ConfigFormat::Toml).unwrap();
        let warnings = collect_warnings(&blueprint);
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("immediately"));
        assert!(warnings[1].contains("orphan"));
    }

    #[test]
    fn test_validate_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(CONFIG.as_bytes()).unwrap();
        let args = ValidateArgs {
            config: file.path().to_path_buf(),
            json: true,
        };
        let result = validate_config(&args);
        assert!(result.valid);
        assert_eq!(result.summary.unwrap().dispatcher_count, 2);
    }

    #[test]
    fn test_missing_file() {
        let args = ValidateArgs {
            config: "/nonexistent/router.toml".into(),
            json: false,
        };
        let result = validate_config(&args);
        assert!(!result.valid);
        assert!(result.error.unwrap().contains("File not found"));
    }
}
