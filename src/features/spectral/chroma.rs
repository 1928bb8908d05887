//! Chroma extraction
//!
//! Folds spectral energy into 12 pitch-class bins by summing magnitude
//! across all frequency bins mapping to the same pitch class across
//! octaves, then normalizes each frame to unit sum so relative harmonic
//! content, not absolute loudness, drives segmentation.

use super::Spectrogram;
use crate::error::AnalysisError;

/// Numerical stability epsilon
const EPSILON: f32 = 1e-10;

/// Number of pitch classes
pub const PITCH_CLASSES: usize = 12;

/// Lowest frequency folded into chroma (Hz); roughly C1
const MIN_FREQUENCY_HZ: f32 = 32.0;

/// Highest frequency folded into chroma (Hz)
///
/// Above this, FFT bins blur across neighbouring semitones and mostly carry
/// percussive energy, which hurts harmonic segmentation.
const MAX_FREQUENCY_HZ: f32 = 5000.0;

/// Fold a magnitude spectrogram into a 12-row chroma representation
///
/// # Arguments
///
/// * `spectrogram` - Magnitude spectrogram (`frame_length / 2 + 1` bins per frame)
/// * `sample_rate` - Sample rate in Hz
/// * `frame_length` - Frame length used to compute the spectrogram
///
/// # Returns
///
/// One 12-element chroma vector per input frame, each L1-normalized to unit
/// sum. Frames with no energy (silence) stay all-zero; the normalization is
/// epsilon-guarded so they never divide by zero.
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` if frames have inconsistent lengths.
pub fn chroma_from_spectrogram(
    spectrogram: &Spectrogram,
    sample_rate: u32,
    frame_length: usize,
) -> Result<Spectrogram, AnalysisError> {
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
        "Folding {} spectral frames of {} bins into {} pitch classes",
        spectrogram.len(),
        n_bins,
        PITCH_CLASSES
    );

    // Precompute the pitch class of each FFT bin; None outside the folded band.
    // Bin k has center frequency k * sr / frame_length; its pitch class is the
    // nearest semitone on the A440 scale, octave-folded.
    let bin_to_class: Vec<Option<usize>> = (0..n_bins)
        .map(|k| {
            if k == 0 {
                return None;
            }
            let freq = k as f32 * sample_rate as f32 / frame_length as f32;
            if !(MIN_FREQUENCY_HZ..=MAX_FREQUENCY_HZ).contains(&freq) {
                return None;
            }
            let midi = 69.0 + 12.0 * (freq / 440.0).log2();
            let class = (midi.round() as i32).rem_euclid(PITCH_CLASSES as i32);
            Some(class as usize)
        })
        .collect();

    let mut chroma = Vec::with_capacity(spectrogram.len());

    for frame in spectrogram {
        let mut folded = vec![0.0f32; PITCH_CLASSES];
        for (mag, class) in frame.iter().zip(bin_to_class.iter()) {
            if let Some(class) = class {
                folded[*class] += mag;
            }
        }

        // Unit-sum normalization, guarded for silent frames
        let sum: f32 = folded.iter().sum();
        if sum > EPSILON {
            for value in &mut folded {
                *value /= sum;
            }
        }

        chroma.push(folded);
    }

    Ok(chroma)
}
