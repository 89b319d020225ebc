//! BackendTransport trait - DispatchClient output interface
//!
//! The wire protocol of the backend call is not owned here: header and
//! body travel as opaque text and the response comes back as text.

use crate::TransportError;

/// Synchronous request/response call to one named backend server.
///
/// Implementations must not retry internally; failover across servers is
/// the caller's job.
#[trait_variant::make(BackendTransport: Send)]
pub trait LocalBackendTransport {
    /// Transport name (used for logging)
    fn name(&self) -> &str;

    /// Deliver `header` and `body` to `endpoint` and wait for its reply
    ///
    /// # Errors
    /// `Unreachable`/`Timeout` when the server could not service the call,
    /// `Rejected` when it answered with a refusal.
    async fn call(&self, endpoint: &str, header: &str, body: &str)
        -> Result<String, TransportError>;
}
