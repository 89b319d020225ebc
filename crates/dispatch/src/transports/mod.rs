//! Transport implementations
//!
//! Contains MockTransport and TcpTransport.

mod mock;
mod tcp;

pub use self::mock::{MockBehavior, MockTransport};
pub use self::tcp::TcpTransport;
