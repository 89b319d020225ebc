//! # Router CLI
//!
//! Command-line entry point.
//!
//! Provides:
//! - Configuration validation and inspection
//! - Server pool resolution
//! - Fan-out routing preview
//! - Request dispatch through a cached client

mod cli;
mod commands;
mod error;

use anyhow::Result;
use clap::Parser;
use observability::ObservabilityConfig;
use tracing::info;

use cli::{Cli, Commands};
use commands::{run_info, run_resolve, run_route, run_send, run_validate};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    observability::init_with_config(observability_config(&cli))?;

    info!(version = env!("CARGO_PKG_VERSION"), "Router CLI starting");

    let result = match &cli.command {
        Commands::Validate(args) => run_validate(args),
        Commands::Info(args) => run_info(args),
        Commands::Resolve(args) => run_resolve(args),
        Commands::Route(args) => run_route(args),
        Commands::Send(args) => run_send(args).await,
    };

    if let Err(ref e) = result {
        tracing::error!(error = %e, "Command failed");
    }

    result
}

/// Logging settings from the global CLI flags
fn observability_config(cli: &Cli) -> ObservabilityConfig {
    ObservabilityConfig::for_cli(cli.log_format.clone().into(), cli.verbose, cli.quiet)
}
