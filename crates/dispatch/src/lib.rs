//! # Dispatch
//!
//! Load-balanced backend dispatch.
//!
//! Responsibilities:
//! - Resolve the server pool of a dispatch stage from the property table
//! - Round-robin selection with client-side failover
//! - Time-based re-admission of failed servers
//! - One shared client per configuration key (`ClientCache`)

pub mod cache;
pub mod client;
pub mod endpoint;
pub mod metrics;
pub mod registry;
pub mod transports;

pub use cache::ClientCache;
pub use client::DispatchClient;
pub use contracts::{BackendTransport, CacheKey, ContractError as DispatchError, TransportError};
pub use endpoint::{EndpointStatus, ServerEndpoint};
pub use metrics::{ClientMetrics, ClientMetricsSnapshot};
pub use registry::ServerRegistry;
pub use transports::{MockBehavior, MockTransport, TcpTransport};
