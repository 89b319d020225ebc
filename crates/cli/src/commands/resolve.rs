//! `resolve` command implementation.

use anyhow::{Context, Result};
use dispatch::ServerRegistry;
use tracing::info;

use super::load_blueprint;
use crate::cli::ResolveArgs;
use crate::error::CliError;

/// Execute the `resolve` command
pub fn run_resolve(args: &ResolveArgs) -> Result<()> {
    let blueprint = load_blueprint(&args.config)?;
    let settings = blueprint
        .dispatcher(&args.dispatcher)
        .ok_or_else(|| CliError::unknown_dispatcher(&args.dispatcher))?;

    let store = config_loader::ConfigLoader::property_store(&blueprint);
    let servers = ServerRegistry::resolve(
        &store,
        &settings.server_name_key,
        &settings.server_name_type_prefix,
    )
    .with_context(|| format!("Failed to resolve servers for '{}'", settings.name))?;

    info!(dispatcher = %settings.name, servers = servers.len(), "Server pool resolved");

    if args.json {
        let json = serde_json::to_string_pretty(&servers)
            .context("Failed to serialize server list")?;
        println!("{}", json);
    } else {
        println!("{} [{}]", settings.name, settings.cache_key());
        for (i, server) in servers.iter().enumerate() {
            println!("  {}. {}", i, server);
        }
    }

    Ok(())
}
