//! # Fanout
//!
//! Batch decomposition and fan-out routing.
//!
//! Responsibilities:
//! - Decompose one batch payload into ordered units
//!   (delimited field lists, ranges, container children)
//! - Emit the unit x destination cross product as an ordered routing list

mod child_nodes;
mod field_list;
mod router;

pub use child_nodes::reversal_table;
pub use router::{FanoutRouter, RoutingSummary};
