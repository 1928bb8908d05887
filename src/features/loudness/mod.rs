//! Loudness analysis
//!
//! Computes RMS energy per frame on the shared frame geometry and flags
//! energy peaks (candidate chorus/drop sections).

pub mod peak_picking;
pub mod rms;

pub use peak_picking::pick_energy_peaks;
pub use rms::rms_envelope;
