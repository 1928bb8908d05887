//! Short-time Fourier transform
//!
//! Segments the signal into overlapping Hann-windowed frames and transforms
//! each frame to a magnitude spectrum. Frames are centered: frame `i` is
//! centered on sample `i * hop_length` and the edges are zero-padded, so a
//! buffer shorter than one frame still produces a (mostly padded) frame
//! rather than an error, and all-silence input yields all-zero spectra.

use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

use super::{FrameAxis, Spectrogram};
use crate::error::AnalysisError;

/// Compute a Hann window of the given length
pub fn hann_window(length: usize) -> Vec<f32> {
    if length <= 1 {
        return vec![1.0; length];
    }
    (0..length)
        .map(|i| {
            0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / (length - 1) as f32).cos())
        })
        .collect()
}

/// Compute the magnitude spectrogram of a signal
///
/// # Arguments
///
/// * `samples` - Mono audio samples
/// * `sample_rate` - Sample rate in Hz
/// * `frame_length` - Analysis frame length in samples
/// * `hop_length` - Hop between consecutive frame centers in samples
///
/// # Returns
///
/// `(spectrogram, axis)` where the spectrogram holds one magnitude vector of
/// `frame_length / 2 + 1` bins per frame and the axis maps frame indices to
/// timestamps.
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` for an empty signal or zero
/// frame/hop lengths.
pub fn magnitude_spectrogram(
    samples: &[f32],
    sample_rate: u32,
    frame_length: usize,
    hop_length: usize,
) -> Result<(Spectrogram, FrameAxis), AnalysisError> {
    if samples.is_empty() {
        return Err(AnalysisError::InvalidInput(
            "Empty audio samples".to_string(),
        ));
    }

    if frame_length == 0 || hop_length == 0 {
        return Err(AnalysisError::InvalidInput(
            "Frame and hop lengths must be > 0".to_string(),
        ));
    }

    let axis = FrameAxis::new(samples.len(), hop_length, sample_rate);
    let n_bins = frame_length / 2 + 1;
    let window = hann_window(frame_length);
    let half = frame_length / 2;

    log::debug!(
        "Computing magnitude spectrogram: {} samples, frame={}, hop={}, {} frames, {} bins",
        samples.len(),
        frame_length,
        hop_length,
        axis.frame_count(),
        n_bins
    );

    let mut planner = FftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(frame_length);

    let mut spectrogram = Vec::with_capacity(axis.frame_count());
    let mut buffer: Vec<Complex<f32>> = vec![Complex::new(0.0, 0.0); frame_length];

    for frame_idx in 0..axis.frame_count() {
        let center = frame_idx * hop_length;

        // Windowed frame centered on `center`, zero-padded at edges
        for (j, (slot, &w)) in buffer.iter_mut().zip(window.iter()).enumerate() {
            let idx = center as isize + j as isize - half as isize;
            let sample = if idx >= 0 && (idx as usize) < samples.len() {
                samples[idx as usize]
            } else {
                0.0
            };
            *slot = Complex::new(sample * w, 0.0);
        }

        fft.process(&mut buffer);

        let magnitudes: Vec<f32> = buffer[..n_bins].iter().map(|c| c.norm()).collect();
        spectrogram.push(magnitudes);
    }

    Ok((spectrogram, axis))
}
