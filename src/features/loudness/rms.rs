//! Frame-level RMS energy
//!
//! Reuses the centered frame/hop geometry of the spectral frontend so the
//! RMS series is index-aligned with every other frame-rate feature. The
//! mean is taken over the full frame length with zero-padded edges, so
//! values taper toward the ends of the signal instead of jumping.

use crate::error::AnalysisError;
use crate::features::spectral::FrameAxis;

/// Compute per-frame RMS energy
///
/// # Arguments
///
/// * `samples` - Mono audio samples
/// * `axis` - Shared frame axis (frame centers and hop geometry)
/// * `frame_length` - Frame length in samples
///
/// # Returns
///
/// One RMS value per frame, always >= 0; exactly 0.0 for frames of pure
/// silence, with no epsilon fuzz.
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` for an empty signal or zero frame
/// length.
pub fn rms_envelope(
    samples: &[f32],
    axis: &FrameAxis,
    frame_length: usize,
) -> Result<Vec<f32>, AnalysisError> {
    if samples.is_empty() {
        return Err(AnalysisError::InvalidInput(
            "Empty audio samples".to_string(),
        ));
    }

    if frame_length == 0 {
        return Err(AnalysisError::InvalidInput(
            "Frame length must be > 0".to_string(),
        ));
    }

    log::debug!(
        "Computing RMS envelope: {} samples, {} frames of {}",
        samples.len(),
        axis.frame_count(),
        frame_length
    );

    let half = frame_length / 2;
    let hop = axis.hop_length();

    let envelope = (0..axis.frame_count())
        .map(|i| {
            let center = i * hop;
            let start = center.saturating_sub(half);
            let end = (center + half).min(samples.len());
            let sum_sq: f32 = samples[start..end].iter().map(|&x| x * x).sum();
            (sum_sq / frame_length as f32).sqrt()
        })
        .collect();

    Ok(envelope)
}
