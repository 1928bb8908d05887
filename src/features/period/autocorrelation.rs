//! Autocorrelation tempo estimation
//!
//! Finds periodicity in the onset-strength envelope using FFT-accelerated
//! autocorrelation: `ACF = IFFT(|FFT(envelope - mean)|²)`. Lags spanning the
//! BPM search range are scored by their periodic energy weighted with a
//! log-normal prior, which breaks octave ties toward plausible tempos.
//!
//! # Reference
//!
//! Ellis, D. P. W. (2007). Beat Tracking by Dynamic Programming.
//! *Journal of New Music Research*, 36(1), 51-60.

use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

use crate::error::AnalysisError;

/// Numerical stability epsilon
const EPSILON: f32 = 1e-10;

/// Tempo estimate with measurement strength
#[derive(Debug, Clone)]
pub struct TempoEstimate {
    /// Tempo in beats per minute, always inside the search range
    pub bpm: f32,

    /// Normalized autocorrelation at the winning lag (0.0-1.0)
    pub strength: f32,

    /// True when the envelope carried no usable periodicity and the
    /// estimate fell back to the prior mode
    pub fallback: bool,
}

/// Estimate tempo from an onset-strength envelope
///
/// # Arguments
///
/// * `envelope` - Onset-strength envelope, one value per frame
/// * `frame_rate` - Envelope frame rate in frames per second
/// * `min_bpm` / `max_bpm` - Tempo search range
/// * `prior_bpm` - Center of the log-normal prior; also the fallback tempo
/// * `prior_octaves` - Standard deviation of the prior in octaves
///
/// # Returns
///
/// A finite, positive tempo inside `[min_bpm, max_bpm]` for any input. A
/// near-constant envelope (silence, steady noise) cannot support a
/// measurement, so the estimate falls back to `prior_bpm` with
/// `fallback = true` instead of failing or dividing by zero.
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` for a non-positive frame rate or
/// an invalid BPM range.
pub fn estimate_tempo(
    envelope: &[f32],
    frame_rate: f32,
    min_bpm: f32,
    max_bpm: f32,
    prior_bpm: f32,
    prior_octaves: f32,
) -> Result<TempoEstimate, AnalysisError> {
    if frame_rate <= 0.0 {
        return Err(AnalysisError::InvalidInput(format!(
            "Invalid frame rate: {}",
            frame_rate
        )));
    }

    if min_bpm <= 0.0 || max_bpm <= 0.0 || min_bpm >= max_bpm {
        return Err(AnalysisError::InvalidInput(format!(
            "Invalid BPM range: [{:.1}, {:.1}]",
            min_bpm, max_bpm
        )));
    }

    log::debug!(
        "Estimating tempo: {} frames at {:.2} fps, range=[{:.1}, {:.1}] BPM, prior={:.1}",
        envelope.len(),
        frame_rate,
        min_bpm,
        max_bpm,
        prior_bpm
    );

    let fallback = |reason: &str| {
        log::warn!("Tempo fallback to prior mode {:.1} BPM: {}", prior_bpm, reason);
        TempoEstimate {
            bpm: prior_bpm,
            strength: 0.0,
            fallback: true,
        }
    };

    if envelope.len() < 2 {
        return Ok(fallback("envelope too short"));
    }

    // Lag range in frames for the BPM search range
    let lag_min = ((60.0 * frame_rate / max_bpm).floor() as usize).max(1);
    let lag_max = ((60.0 * frame_rate / min_bpm).ceil() as usize).min(envelope.len() - 1);

    if lag_min >= lag_max {
        return Ok(fallback("envelope shorter than one beat period"));
    }

    // Remove the DC component so a loud-but-steady envelope does not
    // masquerade as periodicity at every lag
    let mean = envelope.iter().sum::<f32>() / envelope.len() as f32;
    let centered: Vec<f32> = envelope.iter().map(|&x| x - mean).collect();

    let energy: f32 = centered.iter().map(|&x| x * x).sum();
    if energy < EPSILON {
        return Ok(fallback("near-constant envelope"));
    }

    let acf = autocorrelation_fft(&centered);

    // Score each candidate lag: periodic energy times the log-normal prior
    let mut best_lag = 0usize;
    let mut best_score = 0.0f32;
    for lag in lag_min..=lag_max {
        let value = acf[lag].max(0.0);
        let bpm = 60.0 * frame_rate / lag as f32;
        let octaves = (bpm / prior_bpm).log2() / prior_octaves;
        let weight = (-0.5 * octaves * octaves).exp();
        let score = value * weight;
        if score > best_score {
            best_score = score;
            best_lag = lag;
        }
    }

    if best_lag == 0 {
        return Ok(fallback("no periodic energy in search range"));
    }

    // Parabolic interpolation around the winning lag for sub-frame
    // precision; the offset is clamped to half a frame because the prior
    // weighting can select a lag that is not a raw-ACF local maximum
    let refined_lag = if best_lag > lag_min && best_lag < lag_max {
        let prev = acf[best_lag - 1];
        let curr = acf[best_lag];
        let next = acf[best_lag + 1];
        let denom = prev - 2.0 * curr + next;
        if denom.abs() > EPSILON {
            best_lag as f32 + (0.5 * (prev - next) / denom).clamp(-0.5, 0.5)
        } else {
            best_lag as f32
        }
    } else {
        best_lag as f32
    };

    let bpm = (60.0 * frame_rate / refined_lag).clamp(min_bpm, max_bpm);
    let strength = (acf[best_lag].max(0.0) / acf[0].max(EPSILON)).min(1.0);

    log::debug!(
        "Tempo estimate: {:.2} BPM (lag {} -> {:.2} frames, strength {:.3})",
        bpm,
        best_lag,
        refined_lag,
        strength
    );

    Ok(TempoEstimate {
        bpm,
        strength,
        fallback: false,
    })
}

/// Autocorrelation via `IFFT(|FFT(x)|²)`, zero-padded to avoid wrap-around
fn autocorrelation_fft(signal: &[f32]) -> Vec<f32> {
    let n = signal.len();
    let fft_size = (2 * n).next_power_of_two();

    let mut buffer: Vec<Complex<f32>> = signal.iter().map(|&x| Complex::new(x, 0.0)).collect();
    buffer.resize(fft_size, Complex::new(0.0, 0.0));

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(fft_size);
    fft.process(&mut buffer);

    for x in &mut buffer {
        *x = *x * x.conj();
    }

    let ifft = planner.plan_fft_inverse(fft_size);
    ifft.process(&mut buffer);

    let scale = 1.0 / fft_size as f32;
    buffer[..n].iter().map(|x| x.re * scale).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Envelope with impulses every `period` frames
    fn periodic_envelope(len: usize, period: usize) -> Vec<f32> {
        let mut envelope = vec![0.0f32; len];
        let mut i = 0;
        while i < len {
            envelope[i] = 1.0;
            i += period;
        }
        envelope
    }

    #[test]
    fn test_tempo_120_bpm() {
        // 44100 Hz, 512 hop: ~86.13 fps, 120 BPM -> period ~43 frames
        let frame_rate = 44100.0 / 512.0;
        let envelope = periodic_envelope(1000, 43);

        let estimate =
            estimate_tempo(&envelope, frame_rate, 50.0, 220.0, 120.0, 1.0).unwrap();

        assert!(!estimate.fallback);
        assert!(
            (estimate.bpm - 120.0).abs() < 2.0,
            "Expected ~120 BPM, got {:.2}",
            estimate.bpm
        );
        assert!(estimate.strength > 0.0);
    }

    #[test]
    fn test_tempo_90_bpm() {
        let frame_rate = 44100.0 / 512.0;
        // 90 BPM -> 60 * 86.13 / 90 ~= 57.4 frames
        let envelope = periodic_envelope(2000, 57);

        let estimate =
            estimate_tempo(&envelope, frame_rate, 50.0, 220.0, 120.0, 1.0).unwrap();

        assert!(!estimate.fallback);
        assert!(
            (estimate.bpm - 90.0).abs() < 3.0,
            "Expected ~90 BPM, got {:.2}",
            estimate.bpm
        );
    }

    #[test]
    fn test_silence_falls_back_to_prior() {
        let envelope = vec![0.0f32; 1000];
        let estimate = estimate_tempo(&envelope, 86.13, 50.0, 220.0, 120.0, 1.0).unwrap();
        assert!(estimate.fallback);
        assert_eq!(estimate.bpm, 120.0);
    }

    #[test]
    fn test_constant_envelope_falls_back_to_prior() {
        let envelope = vec![0.7f32; 1000];
        let estimate = estimate_tempo(&envelope, 86.13, 50.0, 220.0, 120.0, 1.0).unwrap();
        assert!(estimate.fallback);
        assert_eq!(estimate.bpm, 120.0);
    }

    #[test]
    fn test_short_envelope_falls_back() {
        let estimate = estimate_tempo(&[1.0], 86.13, 50.0, 220.0, 120.0, 1.0).unwrap();
        assert!(estimate.fallback);
    }

    #[test]
    fn test_estimate_always_in_range() {
        let frame_rate = 86.13;
        for period in [10usize, 20, 43, 80, 120] {
            let envelope = periodic_envelope(2000, period);
            let estimate =
                estimate_tempo(&envelope, frame_rate, 50.0, 220.0, 120.0, 1.0).unwrap();
            assert!(estimate.bpm >= 50.0 && estimate.bpm <= 220.0);
            assert!(estimate.bpm.is_finite());
        }
    }

    #[test]
    fn test_invalid_params_rejected() {
        assert!(estimate_tempo(&[0.0; 10], 0.0, 50.0, 220.0, 120.0, 1.0).is_err());
        assert!(estimate_tempo(&[0.0; 10], 86.13, 220.0, 50.0, 120.0, 1.0).is_err());
    }

    #[test]
    fn test_autocorrelation_peak_at_period() {
        let signal: Vec<f32> = periodic_envelope(64, 8)
            .iter()
            .map(|&x| x - 0.125)
            .collect();
        let acf = autocorrelation_fft(&signal);
        assert_eq!(acf.len(), 64);
        // Lag 8 should correlate far better than lag 4
        assert!(acf[8] > acf[4]);
    }
}
