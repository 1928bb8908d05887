//! Analysis result aggregation
//!
//! Combines all feature outputs into the final time-aligned result:
//! - Result and event types
//! - Aggregation bookkeeping (duration, counts, per-second energy view)

pub mod aggregator;
pub mod result;
