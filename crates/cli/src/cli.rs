//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Router - load-balanced backend dispatch and batch fan-out
#[derive(Parser, Debug)]
#[command(
    name = "router-cli",
    author,
    version,
    about = "Load-balanced dispatch and fan-out routing",
    long_about = "Inspects and exercises routing configuration.\n\n\
                  Resolves backend server pools, sends requests through a \n\
                  round-robin client with failover, and shows how batch \n\
                  payloads are split and addressed to next stages."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "ROUTER_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "ROUTER_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate configuration file
    Validate(ValidateArgs),

    /// Display configuration information
    Info(InfoArgs),

    /// Resolve the server pool of a dispatch stage
    Resolve(ResolveArgs),

    /// Split a payload and print its routing list
    Route(RouteArgs),

    /// Send a request through a dispatch stage
    Send(SendArgs),
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "router.toml", env = "ROUTER_CONFIG")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "router.toml", env = "ROUTER_CONFIG")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `resolve` command
#[derive(Parser, Debug)]
pub struct ResolveArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "router.toml", env = "ROUTER_CONFIG")]
    pub config: PathBuf,

    /// Dispatch stage name
    #[arg(short, long)]
    pub dispatcher: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `route` command
#[derive(Parser, Debug)]
pub struct RouteArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "router.toml", env = "ROUTER_CONFIG")]
    pub config: PathBuf,

    /// Fan-out stage name
    #[arg(short, long)]
    pub splitter: String,

    /// Payload document (JSON)
    #[arg(short, long)]
    pub payload: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `send` command
#[derive(Parser, Debug, Clone)]
pub struct SendArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "router.toml", env = "ROUTER_CONFIG")]
    pub config: PathBuf,

    /// Dispatch stage name
    #[arg(short, long)]
    pub dispatcher: String,

    /// Request header
    #[arg(long, default_value = "")]
    pub header: String,

    /// Request body
    #[arg(long)]
    pub body: String,

    /// Number of requests to send
    #[arg(short = 'n', long, default_value = "1")]
    pub count: u32,

    /// Use the in-process mock backend instead of TCP
    #[arg(long)]
    pub mock: bool,

    /// Endpoints the mock backend treats as unreachable
    #[arg(long, requires = "mock")]
    pub mock_fail: Vec<String>,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "ROUTER_METRICS_PORT")]
    pub metrics_port: u16,
}

/// Log output format
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}
