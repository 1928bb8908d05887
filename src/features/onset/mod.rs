//! Onset detection
//!
//! Derives an onset-strength envelope from the magnitude spectrogram
//! (spectral flux) and picks discrete onset events from it with an
//! adaptive local-mean threshold.

pub mod peak_picking;
pub mod spectral_flux;

pub use peak_picking::{pick_onsets, OnsetPicker};
pub use spectral_flux::onset_envelope;
