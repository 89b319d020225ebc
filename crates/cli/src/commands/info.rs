//! `info` command implementation.

use anyhow::{Context, Result};
use contracts::{PipelineBlueprint, SplitMode};
use dispatch::ServerRegistry;
use serde::Serialize;
use tracing::info;

use super::load_blueprint;
use crate::cli::InfoArgs;

/// Configuration info for JSON output
#[derive(Serialize)]
struct ConfigInfo {
    version: String,
    dispatchers: Vec<DispatcherInfo>,
    splitters: Vec<SplitterInfo>,
}

#[derive(Serialize)]
struct DispatcherInfo {
    name: String,
    cache_key: String,
    servers: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    resolve_error: Option<String>,
    retry_ms: u64,
    timeout_ms: u64,
    header_location: String,
    message_location: String,
}

#[derive(Serialize)]
struct SplitterInfo {
    name: String,
    mode: String,
    source: String,
    destinations: Vec<String>,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration info");

    let blueprint = load_blueprint(&args.config)?;
    let info = build_config_info(&blueprint);

    if args.json {
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize config info")?;
        println!("{}", json);
    } else {
        print_config_info(&info);
    }

    Ok(())
}

fn build_config_info(blueprint: &PipelineBlueprint) -> ConfigInfo {
    let store = config_loader::ConfigLoader::property_store(blueprint);

    let dispatchers = blueprint
        .dispatchers
        .iter()
        .map(|d| {
            let resolved =
                ServerRegistry::resolve(&store, &d.server_name_key, &d.server_name_type_prefix);
            let (servers, resolve_error) = match resolved {
                Ok(servers) => (servers, None),
                Err(e) => (Vec::new(), Some(e.to_string())),
            };
            DispatcherInfo {
                name: d.name.clone(),
                cache_key: d.cache_key().to_string(),
                servers,
                resolve_error,
                retry_ms: d.down_server_retry_time_ms,
                timeout_ms: d.call_timeout_ms,
                header_location: d.header_location.clone(),
                message_location: d.message_location.clone(),
            }
        })
        .collect();

    let splitters = blueprint
        .splitters
        .iter()
        .map(|s| SplitterInfo {
            name: s.name.clone(),
            mode: s.mode.label().to_string(),
            source: match &s.mode {
                SplitMode::FieldList(cfg) => cfg.primary_path.clone(),
                SplitMode::ChildNodes(cfg) => cfg.container_path.clone(),
            },
            destinations: s.destinations.clone(),
        })
        .collect();

    ConfigInfo {
        version: format!("{:?}", blueprint.version),
        dispatchers,
        splitters,
    }
}

fn print_config_info(info: &ConfigInfo) {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                  Router Configuration                        ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("Version: {}", info.version);

    println!("\n📡 Dispatchers ({})", info.dispatchers.len());
    for (i, d) in info.dispatchers.iter().enumerate() {
        let is_last = i == info.dispatchers.len() - 1;
        let prefix = if is_last { "└─" } else { "├─" };
        let child_prefix = if is_last { "   " } else { "│  " };

        println!("   {} {} [{}]", prefix, d.name, d.cache_key);
        println!(
            "   {}  ├─ retry {} ms, timeout {} ms",
            child_prefix, d.retry_ms, d.timeout_ms
        );
        println!(
            "   {}  ├─ header {}, body {}",
            child_prefix, d.header_location, d.message_location
        );
        match &d.resolve_error {
            Some(error) => println!("   {}  └─ ✗ {}", child_prefix, error),
            None => println!("   {}  └─ servers: {}", child_prefix, d.servers.join(", ")),
        }
    }

    println!("\n🔀 Splitters ({})", info.splitters.len());
    for (i, s) in info.splitters.iter().enumerate() {
        let is_last = i == info.splitters.len() - 1;
        let prefix = if is_last { "└─" } else { "├─" };
        println!(
            "   {} {} ({} on {}) -> {}",
            prefix,
            s.name,
            s.mode,
            s.source,
            s.destinations.join(", ")
        );
    }

    println!();
}
