//! Per-client dispatch metrics

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters of a single DispatchClient
#[derive(Debug, Default)]
pub struct ClientMetrics {
    /// Total send() calls
    calls: AtomicU64,
    /// Calls answered by some endpoint
    successes: AtomicU64,
    /// Endpoint failures recovered by trying the next endpoint
    failovers: AtomicU64,
    /// Calls refused by the backend
    rejected: AtomicU64,
    /// Calls failed because no endpoint could service them
    exhausted: AtomicU64,
    /// Candidates skipped while still inside their retry interval
    skipped_ineligible: AtomicU64,
}

impl ClientMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }

    pub fn inc_calls(&self) {
        self.calls.fetch_add(1, Ordering::Relaxed);
    }

    pub fn successes(&self) -> u64 {
        self.successes.load(Ordering::Relaxed)
    }

    pub fn inc_successes(&self) {
        self.successes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn failovers(&self) -> u64 {
        self.failovers.load(Ordering::Relaxed)
    }

    pub fn inc_failovers(&self) {
        self.failovers.fetch_add(1, Ordering::Relaxed);
    }

    pub fn rejected(&self) -> u64 {
        self.rejected.load(Ordering::Relaxed)
    }

    pub fn inc_rejected(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn exhausted(&self) -> u64 {
        self.exhausted.load(Ordering::Relaxed)
    }

    pub fn inc_exhausted(&self) {
        self.exhausted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn skipped_ineligible(&self) -> u64 {
        self.skipped_ineligible.load(Ordering::Relaxed)
    }

    pub fn inc_skipped_ineligible(&self) {
        self.skipped_ineligible.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> ClientMetricsSnapshot {
        ClientMetricsSnapshot {
            calls: self.calls(),
            successes: self.successes(),
            failovers: self.failovers(),
            rejected: self.rejected(),
            exhausted: self.exhausted(),
            skipped_ineligible: self.skipped_ineligible(),
        }
    }
}

/// Snapshot of client metrics (for reporting)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClientMetricsSnapshot {
    pub calls: u64,
    pub successes: u64,
    pub failovers: u64,
    pub rejected: u64,
    pub exhausted: u64,
    pub skipped_ineligible: u64,
}
