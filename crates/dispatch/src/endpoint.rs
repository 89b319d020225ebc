//! Backend endpoint health state

use std::time::Duration;

use tokio::time::Instant;

/// One candidate backend of a pool
///
/// Never removed: a failed endpoint is only marked and re-admitted once the
/// retry interval has elapsed since its last failure.
#[derive(Debug, Clone)]
pub struct ServerEndpoint {
    name: String,
    last_failure: Option<Instant>,
}

impl ServerEndpoint {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            last_failure: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn last_failure(&self) -> Option<Instant> {
        self.last_failure
    }

    /// Never failed, or failed at least `retry_interval` ago
    pub fn is_eligible(&self, now: Instant, retry_interval: Duration) -> bool {
        match self.last_failure {
            None => true,
            Some(failed_at) => now.saturating_duration_since(failed_at) >= retry_interval,
        }
    }

    /// Record a failure (last writer wins)
    pub fn mark_failed(&mut self, now: Instant) {
        self.last_failure = Some(now);
    }

    /// Point-in-time view for reporting
    pub fn status(&self, now: Instant, retry_interval: Duration) -> EndpointStatus {
        EndpointStatus {
            name: self.name.clone(),
            eligible: self.is_eligible(now, retry_interval),
            last_failure: self
                .last_failure
                .map(|failed_at| now.saturating_duration_since(failed_at)),
        }
    }
}

/// Health snapshot of one endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointStatus {
    pub name: String,
    pub eligible: bool,
    /// Time elapsed since the last recorded failure
    pub last_failure: Option<Duration>,
}
