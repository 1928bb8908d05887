//! Tempo estimation
//!
//! Converts the onset-strength envelope into a single BPM estimate via
//! autocorrelation over the configured tempo search range, weighted by a
//! log-normal prior.

pub mod autocorrelation;

pub use autocorrelation::{estimate_tempo, TempoEstimate};
