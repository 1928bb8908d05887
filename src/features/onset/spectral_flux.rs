//! Spectral flux onset-strength envelope
//!
//! Envelope value at frame `i` is the half-wave-rectified sum of positive
//! spectral-magnitude increases from frame `i-1` to frame `i`, optionally
//! smoothed with a short centered moving average to suppress noise.
//!
//! # Reference
//!
//! Bello, J. P., Daudet, L., Abdallah, S., Duxbury, C., Davies, M., &
//! Sandler, M. B. (2005). A Tutorial on Onset Detection in Music Signals.
//! *IEEE Transactions on Speech and Audio Processing*, 13(5), 1035-1047.

use crate::error::AnalysisError;
use crate::features::spectral::Spectrogram;

/// Compute the onset-strength envelope from a magnitude spectrogram
///
/// # Arguments
///
/// * `spectrogram` - Magnitude spectrogram (consistent bin count per frame)
/// * `smoothing_frames` - Centered moving-average width; values <= 1 disable
///   smoothing, even widths are rounded up to the next odd width
///
/// # Returns
///
/// One non-negative flux value per frame. The first frame has no
/// predecessor, so its flux is zero. The envelope is deliberately left
/// unnormalized; consumers threshold it relative to local statistics.
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` if frames have inconsistent lengths.
pub fn onset_envelope(
    spectrogram: &Spectrogram,
    smoothing_frames: usize,
) -> Result<Vec<f32>, AnalysisError> {
    if spectrogram.is_empty() {
        return Ok(Vec::new());
    }

    let n_bins = spectrogram[0].len();
    for (i, frame) in spectrogram.iter().enumerate() {
        if frame.len() != n_bins {
            return Err(AnalysisError::InvalidInput(format!(
                "Inconsistent frame lengths: frame 0 has {} bins, frame {} has {} bins",
                n_bins,
                i,
                frame.len()
            )));
        }
    }

    log::debug!(
        "Computing onset envelope: {} frames, {} bins, smoothing={}",
        spectrogram.len(),
        n_bins,
        smoothing_frames
    );

    // Step 1: half-wave-rectified spectral flux, first frame pinned to zero
    let mut envelope = vec![0.0f32; spectrogram.len()];
    for i in 1..spectrogram.len() {
        let flux: f32 = spectrogram[i]
            .iter()
            .zip(spectrogram[i - 1].iter())
            .map(|(&curr, &prev)| (curr - prev).max(0.0))
            .sum();
        envelope[i] = flux;
    }

    // Step 2: optional centered moving average
    if smoothing_frames > 1 {
        let radius = smoothing_frames / 2;
        let smoothed: Vec<f32> = (0..envelope.len())
            .map(|i| {
                let start = i.saturating_sub(radius);
                let end = (i + radius + 1).min(envelope.len());
                envelope[start..end].iter().sum::<f32>() / (end - start) as f32
            })
            .collect();
        envelope = smoothed;
    }

    Ok(envelope)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_flux_is_zero_unsmoothed() {
        let spec = vec![vec![1.0, 1.0], vec![2.0, 2.0], vec![1.0, 1.0]];
        let envelope = onset_envelope(&spec, 1).unwrap();
        assert_eq!(envelope[0], 0.0);
        assert_eq!(envelope[1], 2.0);
        // Decrease is rectified away
        assert_eq!(envelope[2], 0.0);
    }

    #[test]
    fn test_envelope_non_negative() {
        let spec = vec![
            vec![5.0, 0.0, 3.0],
            vec![0.0, 4.0, 0.0],
            vec![2.0, 0.0, 1.0],
        ];
        let envelope = onset_envelope(&spec, 3).unwrap();
        for &value in &envelope {
            assert!(value >= 0.0);
        }
    }

    #[test]
    fn test_envelope_zero_for_constant_spectrum() {
        let spec = vec![vec![1.0, 2.0, 3.0]; 50];
        let envelope = onset_envelope(&spec, 3).unwrap();
        for &value in &envelope {
            assert_eq!(value, 0.0);
        }
    }

    #[test]
    fn test_envelope_length_matches_frames() {
        let spec = vec![vec![0.0; 10]; 25];
        let envelope = onset_envelope(&spec, 3).unwrap();
        assert_eq!(envelope.len(), 25);
    }

    #[test]
    fn test_inconsistent_frames_rejected() {
        let spec = vec![vec![0.0; 10], vec![0.0; 9]];
        assert!(onset_envelope(&spec, 1).is_err());
    }

    #[test]
    fn test_empty_spectrogram() {
        let envelope = onset_envelope(&Vec::new(), 3).unwrap();
        assert!(envelope.is_empty());
    }
}
