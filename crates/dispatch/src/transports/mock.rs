//! MockTransport - scripted in-process backend
//!
//! Used by unit tests and by the CLI `--mock` mode. Every endpoint follows
//! a behaviour (echo by default) that can be changed at any time, and each
//! call is logged in arrival order.

use std::collections::HashMap;
use std::time::Duration;

use contracts::{BackendTransport, TransportError};
use parking_lot::Mutex;
use tracing::{debug, instrument};

/// How a mock endpoint answers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockBehavior {
    /// Answer `"<endpoint>:<body>"`
    Echo,
    /// Answer with a fixed response
    Respond(String),
    /// Connection-level failure
    Unreachable(String),
    /// Backend refusal
    Reject(String),
    /// Echo after sleeping
    Delay(Duration),
}

impl MockBehavior {
    pub fn unreachable(message: impl Into<String>) -> Self {
        Self::Unreachable(message.into())
    }
}

/// Scripted backend transport
#[derive(Debug)]
pub struct MockTransport {
    default: MockBehavior,
    behaviors: Mutex<HashMap<String, MockBehavior>>,
    calls: Mutex<Vec<String>>,
}

impl MockTransport {
    /// Every endpoint echoes
    pub fn new() -> Self {
        Self::with_default(MockBehavior::Echo)
    }

    /// Endpoints without a specific behaviour follow `default`
    pub fn with_default(default: MockBehavior) -> Self {
        Self {
            default,
            behaviors: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Builder: script one endpoint
    pub fn with_behavior(self, endpoint: impl Into<String>, behavior: MockBehavior) -> Self {
        self.set_behavior(endpoint, behavior);
        self
    }

    /// Change one endpoint's behaviour
    pub fn set_behavior(&self, endpoint: impl Into<String>, behavior: MockBehavior) {
        self.behaviors.lock().insert(endpoint.into(), behavior);
    }

    /// Endpoints called so far, in call order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    /// Number of calls received by `endpoint`
    pub fn call_count(&self, endpoint: &str) -> usize {
        self.calls.lock().iter().filter(|c| *c == endpoint).count()
    }

    fn behavior(&self, endpoint: &str) -> MockBehavior {
        self.behaviors
            .lock()
            .get(endpoint)
            .cloned()
            .unwrap_or_else(|| self.default.clone())
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl BackendTransport for MockTransport {
    fn name(&self) -> &str {
        "mock"
    }

    #[instrument(name = "mock_transport_call", skip(self, endpoint, header, body), fields(endpoint = %endpoint))]
    async fn call(&self, endpoint: &str, header: &str, body: &str) -> Result<String, TransportError> {
        let _ = header;
        self.calls.lock().push(endpoint.to_string());
        let behavior = self.behavior(endpoint);
        debug!(?behavior, "Mock call");

        match behavior {
            MockBehavior::Echo => Ok(format!("{endpoint}:{body}")),
            MockBehavior::Respond(response) => Ok(response),
            MockBehavior::Unreachable(message) => Err(TransportError::unreachable(endpoint, message)),
            MockBehavior::Reject(reason) => Err(TransportError::rejected(endpoint, reason)),
            MockBehavior::Delay(delay) => {
                tokio::time::sleep(delay).await;
                Ok(format!("{endpoint}:{body}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_behaviours() {
        let mock = MockTransport::new()
            .with_behavior("down", MockBehavior::unreachable("refused"))
            .with_behavior("fixed", MockBehavior::Respond("OK".into()));

        assert_eq!(mock.call("up", "h", "b").await.unwrap(), "up:b");
        assert_eq!(mock.call("fixed", "h", "b").await.unwrap(), "OK");
        let err = mock.call("down", "h", "b").await.unwrap_err();
        assert_eq!(err, TransportError::unreachable("down", "refused"));

        assert_eq!(mock.calls(), ["up", "fixed", "down"]);
        assert_eq!(mock.call_count("up"), 1);
    }

    #[tokio::test]
    async fn test_default_behaviour() {
        let mock = MockTransport::with_default(MockBehavior::Reject("closed".into()));
        let err = mock.call("any", "h", "b").await.unwrap_err();
        assert!(!err.triggers_failover());
    }
}
