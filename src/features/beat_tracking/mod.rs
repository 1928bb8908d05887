//! Beat placement
//!
//! Places a beat sequence consistent with the estimated tempo by dynamic
//! programming over the onset-strength envelope.

pub mod dynamic;

pub use dynamic::track_beats;
