//! Aggregation engine.
//!
//! Validation and the year/title rollups live in `aggregator`; the
//! selection state machine lives in `selection`.

pub mod aggregator;
pub mod selection;

pub use aggregator::*;
pub use selection::{SelectionController, SelectionTicket};
