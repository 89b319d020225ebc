//! DispatchClient - round-robin dispatch with failover
//!
//! Every pick, failover picks included, takes the position under the shared
//! cursor and advances it by one, skipping endpoints that are not eligible.
//! An endpoint is eligible when it never failed or its last failure is at
//! least `retry_interval` old. One call consumes at most one round of
//! positions.
//!
//! Unreachable or timed-out endpoints are marked failed and the call moves
//! on to the next pick. A backend rejection ends the call at once.

use std::sync::Arc;
use std::time::Duration;

use contracts::{BackendTransport, ContractError, TransportError};
use observability::CallStatus;
use parking_lot::Mutex;
use tokio::time::Instant;
use tracing::{debug, instrument, warn};

use crate::endpoint::{EndpointStatus, ServerEndpoint};
use crate::metrics::ClientMetrics;

/// Cursor and health state, guarded together
#[derive(Debug)]
struct PoolState {
    endpoints: Vec<ServerEndpoint>,
    cursor: usize,
}

/// Load-balanced client for one backend pool
pub struct DispatchClient<T> {
    names: Vec<String>,
    retry_interval: Duration,
    call_timeout: Duration,
    transport: Arc<T>,
    state: Mutex<PoolState>,
    metrics: ClientMetrics,
}

impl<T> DispatchClient<T> {
    /// Create a client over `endpoints` (in round-robin order)
    ///
    /// # Errors
    /// `Configuration` when `endpoints` is empty.
    pub fn new(
        endpoints: Vec<String>,
        retry_interval: Duration,
        call_timeout: Duration,
        transport: Arc<T>,
    ) -> Result<Self, ContractError> {
        if endpoints.is_empty() {
            return Err(ContractError::configuration(
                "dispatch_client",
                "cannot create a client without endpoints",
            ));
        }

        let state = PoolState {
            endpoints: endpoints.iter().map(ServerEndpoint::new).collect(),
            cursor: 0,
        };

        Ok(Self {
            names: endpoints,
            retry_interval,
            call_timeout,
            transport,
            state: Mutex::new(state),
            metrics: ClientMetrics::new(),
        })
    }

    /// Endpoint names in round-robin order
    pub fn endpoint_names(&self) -> &[String] {
        &self.names
    }

    /// Health snapshot of every endpoint
    pub fn endpoints(&self) -> Vec<EndpointStatus> {
        let now = Instant::now();
        self.state
            .lock()
            .endpoints
            .iter()
            .map(|e| e.status(now, self.retry_interval))
            .collect()
    }

    /// Re-admission interval
    pub fn retry_interval(&self) -> Duration {
        self.retry_interval
    }

    /// Per-endpoint call timeout
    pub fn call_timeout(&self) -> Duration {
        self.call_timeout
    }

    /// Client counters
    pub fn metrics(&self) -> &ClientMetrics {
        &self.metrics
    }

    /// Pick the next eligible endpoint
    ///
    /// Reads and advances the shared cursor under one lock, so concurrent
    /// picks never land on the same position. `budget` is the number of
    /// positions the call may still consume.
    fn select(&self, budget: &mut usize) -> Option<usize> {
        let now = Instant::now();
        let mut state = self.state.lock();
        let n = state.endpoints.len();

        while *budget > 0 {
            let idx = state.cursor;
            state.cursor = (idx + 1) % n;
            *budget -= 1;

            if state.endpoints[idx].is_eligible(now, self.retry_interval) {
                return Some(idx);
            }
            self.metrics.inc_skipped_ineligible();
        }
        None
    }

    fn mark_failed(&self, idx: usize) {
        self.state.lock().endpoints[idx].mark_failed(Instant::now());
    }

    fn timeout_ms(&self) -> u64 {
        u64::try_from(self.call_timeout.as_millis()).unwrap_or(u64::MAX)
    }
}

impl<T: BackendTransport> DispatchClient<T> {
    /// Send one request to the pool
    ///
    /// # Errors
    /// - `Rejected` when the backend refused the request
    /// - `Dispatch` when no endpoint could service it, carrying the last
    ///   endpoint failure (none when every endpoint was still excluded)
    #[instrument(
        name = "dispatch_client_send",
        skip(self, header, body),
        fields(pool = self.names.len(), transport = self.transport.name())
    )]
    pub async fn send(&self, header: &str, body: &str) -> Result<String, ContractError> {
        self.metrics.inc_calls();
        let started = Instant::now();

        let mut budget = self.names.len();
        let mut attempts = 0;
        let mut last_error = None;

        while let Some(idx) = self.select(&mut budget) {
            attempts += 1;
            let endpoint = &self.names[idx];
            debug!(endpoint = %endpoint, attempt = attempts, "Calling endpoint");

            match self.call_endpoint(endpoint, header, body).await {
                Ok(response) => {
                    self.metrics.inc_successes();
                    observability::record_dispatch_call(CallStatus::Success);
                    observability::record_dispatch_latency_ms(
                        started.elapsed().as_secs_f64() * 1000.0,
                    );
                    return Ok(response);
                }
                Err(TransportError::Rejected { endpoint, reason }) => {
                    self.metrics.inc_rejected();
                    observability::record_dispatch_call(CallStatus::Rejected);
                    warn!(endpoint = %endpoint, reason = %reason, "Request rejected");
                    return Err(ContractError::Rejected { endpoint, reason });
                }
                Err(err) => {
                    self.mark_failed(idx);
                    self.metrics.inc_failovers();
                    observability::record_dispatch_failover(endpoint);
                    warn!(endpoint = %endpoint, attempt = attempts, error = %err, "Endpoint failed, trying next");
                    last_error = Some(err);
                }
            }
        }

        self.metrics.inc_exhausted();
        observability::record_dispatch_call(CallStatus::Exhausted);
        warn!(attempts, "No endpoint available");
        Err(ContractError::Dispatch {
            endpoints: self.names.clone(),
            attempts,
            last_error,
        })
    }

    async fn call_endpoint(
        &self,
        endpoint: &str,
        header: &str,
        body: &str,
    ) -> Result<String, TransportError> {
        let call = self.transport.call(endpoint, header, body);
        match tokio::time::timeout(self.call_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(TransportError::Timeout {
                endpoint: endpoint.to_string(),
                timeout_ms: self.timeout_ms(),
            }),
        }
    }
}

impl<T> std::fmt::Debug for DispatchClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchClient")
            .field("endpoints", &self.names)
            .field("retry_interval", &self.retry_interval)
            .field("call_timeout", &self.call_timeout)
            .finish()
    }
}
