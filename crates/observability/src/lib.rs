//! # Observability
//!
//! Tracing and Prometheus metrics for the routing crates.
//!
//! ## Features
//!
//! - Tracing initialisation (JSON/Pretty/Compact)
//! - Prometheus metrics export
//! - Dispatch and fan-out recorders, run summaries
//!
//! ## Example
//!
//! ```ignore
//! use observability::{metrics, LogFormat, ObservabilityConfig};
//!
//! observability::init_with_config(ObservabilityConfig {
//!     log_format: LogFormat::Compact,
//!     ..Default::default()
//! })?;
//!
//! let mut runs = metrics::DispatchAggregator::new();
//! runs.update(metrics::CallStatus::Success, 3.2);
//! println!("{}", runs.summary());
//! ```

pub mod metrics;

use anyhow::{Context, Result};
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

// Re-exports
pub use crate::metrics::{
    record_dispatch_call, record_dispatch_failover, record_dispatch_latency_ms, record_fanout,
    CallStatus, DispatchAggregator, DispatchSummary, RunningStats, StatsSummary,
};

/// Observability settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservabilityConfig {
    /// Log format
    pub log_format: LogFormat,
    /// Filter used when `RUST_LOG` is unset or ignored
    pub default_log_level: String,
    /// Whether `RUST_LOG` overrides `default_log_level`
    pub honour_rust_log: bool,
    /// Prometheus port (None = disabled)
    pub metrics_port: Option<u16>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Pretty,
            default_log_level: "info".to_string(),
            honour_rust_log: true,
            metrics_port: None,
        }
    }
}

impl ObservabilityConfig {
    /// Settings for a command-line run
    ///
    /// `quiet` pins the filter to `warn`; otherwise each `verbose` step
    /// lowers the default level (info, debug, trace).
    pub fn for_cli(log_format: LogFormat, verbose: u8, quiet: bool) -> Self {
        let (level, honour_rust_log) = if quiet {
            ("warn", false)
        } else {
            let level = match verbose {
                0 => "info",
                1 => "debug",
                _ => "trace",
            };
            (level, true)
        };
        Self {
            log_format,
            default_log_level: level.to_string(),
            honour_rust_log,
            metrics_port: None,
        }
    }

    fn filter(&self) -> EnvFilter {
        if self.honour_rust_log {
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&self.default_log_level))
        } else {
            EnvFilter::new(&self.default_log_level)
        }
    }
}

/// Log format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Structured JSON
    Json,
    /// Human readable
    #[default]
    Pretty,
    /// Compact single line
    Compact,
}

/// Install the tracing subscriber and, if configured, the Prometheus exporter
pub fn init_with_config(config: ObservabilityConfig) -> Result<()> {
    let fmt_layer = match config.log_format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true)
            .with_thread_names(true)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
        LogFormat::Pretty => fmt::layer().pretty().boxed(),
        LogFormat::Compact => fmt::layer().compact().boxed(),
    };

    tracing_subscriber::registry()
        .with(config.filter())
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize tracing subscriber")?;

    if let Some(port) = config.metrics_port {
        init_metrics_only(port)?;
    }

    tracing::debug!(
        log_format = ?config.log_format,
        level = %config.default_log_level,
        metrics_port = ?config.metrics_port,
        "Observability initialized"
    );
    Ok(())
}

/// Install only the Prometheus exporter
///
/// For processes whose tracing subscriber is set up elsewhere.
pub fn init_metrics_only(port: u16) -> Result<()> {
    let builder = PrometheusBuilder::new();
    builder
        .with_http_listener(([0, 0, 0, 0], port))
        .install()
        .context("Failed to install Prometheus recorder")?;

    tracing::info!(port = port, "Prometheus metrics endpoint initialized");
    Ok(())
}
