//! # Contracts
//!
//! Frozen interface contracts shared by every routing crate.
//! Business crates depend only on this crate, never on each other.
//!
//! ## Units of work
//! - A dispatch stage sends one opaque `(header, body)` text pair to one
//!   endpoint of a load-balanced pool and gets one text response back.
//! - A splitting stage turns one [`Document`] into an ordered list of
//!   [`RouteEntry`] values, one per `(unit, destination)` pair.

mod blueprint;
mod document;
mod error;
mod property;
mod routing;
mod transport;

pub use blueprint::*;
pub use document::{Document, Node};
pub use error::*;
pub use property::{PropertySource, SERVER_NAME_PROP};
pub use routing::*;
pub use transport::{BackendTransport, LocalBackendTransport};
