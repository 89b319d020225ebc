//! Routing metrics
//!
//! `metrics` facade recorders for dispatch and fan-out, plus an in-memory
//! aggregator for run summaries.

use metrics::{counter, histogram};

/// Outcome of one dispatch call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallStatus {
    /// Some endpoint answered
    Success,
    /// The backend refused the request
    Rejected,
    /// No endpoint could service the request
    Exhausted,
}

impl CallStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Rejected => "rejected",
            Self::Exhausted => "exhausted",
        }
    }
}

/// Record the outcome of one dispatch call
///
/// # Example
///
/// ```ignore
/// use observability::metrics::{record_dispatch_call, CallStatus};
///
/// match client.send(header, body).await {
///     Ok(_) => record_dispatch_call(CallStatus::Success),
///     Err(_) => record_dispatch_call(CallStatus::Exhausted),
/// }
/// ```
pub fn record_dispatch_call(status: CallStatus) {
    counter!(
        "router_dispatch_calls_total",
        "status" => status.as_str()
    )
    .increment(1);
}

/// Record an endpoint failure recovered by failover
pub fn record_dispatch_failover(endpoint: &str) {
    counter!(
        "router_dispatch_failover_total",
        "endpoint" => endpoint.to_string()
    )
    .increment(1);
}

/// Record end-to-end latency of a successful dispatch call
pub fn record_dispatch_latency_ms(latency_ms: f64) {
    histogram!("router_dispatch_latency_ms").record(latency_ms);
}

/// Record one fan-out: routing entries emitted and data units (sentinel excluded)
pub fn record_fanout(mode: &'static str, entries: usize, data_units: usize) {
    counter!("router_fanout_entries_total", "mode" => mode).increment(entries as u64);
    histogram!("router_fanout_units").record(data_units as f64);
}

/// Dispatch run aggregator
///
/// Aggregates call outcomes in memory to print a summary.
#[derive(Debug, Clone, Default)]
pub struct DispatchAggregator {
    pub successes: u64,
    pub rejected: u64,
    pub exhausted: u64,
    latency_ms: RunningStats,
}

impl DispatchAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one call outcome
    pub fn update(&mut self, status: CallStatus, latency_ms: f64) {
        match status {
            CallStatus::Success => self.successes += 1,
            CallStatus::Rejected => self.rejected += 1,
            CallStatus::Exhausted => self.exhausted += 1,
        }
        self.latency_ms.push(latency_ms);
    }

    pub fn total(&self) -> u64 {
        self.successes + self.rejected + self.exhausted
    }

    /// Build the summary report
    pub fn summary(&self) -> DispatchSummary {
        let total = self.total();
        DispatchSummary {
            total_calls: total,
            successes: self.successes,
            rejected: self.rejected,
            exhausted: self.exhausted,
            success_rate: if total > 0 {
                self.successes as f64 / total as f64 * 100.0
            } else {
                0.0
            },
            latency_ms: StatsSummary::from(&self.latency_ms),
        }
    }
}

/// Dispatch run summary
#[derive(Debug, Clone, Default)]
pub struct DispatchSummary {
    pub total_calls: u64,
    pub successes: u64,
    pub rejected: u64,
    pub exhausted: u64,
    pub success_rate: f64,
    pub latency_ms: StatsSummary,
}

impl std::fmt::Display for DispatchSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Dispatch Summary ===")?;
        writeln!(f, "Total calls: {}", self.total_calls)?;
        writeln!(
            f,
            "Succeeded: {} ({:.2}%)",
            self.successes, self.success_rate
        )?;
        writeln!(f, "Rejected: {}", self.rejected)?;
        writeln!(f, "Exhausted: {}", self.exhausted)?;
        writeln!(f, "Latency (ms): {}", self.latency_ms)
    }
}

/// Summary statistics
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// Online statistics (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// Add one sample
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// Sample variance
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}
