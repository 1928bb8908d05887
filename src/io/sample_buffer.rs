//! Validated sample buffer

use crate::error::AnalysisError;

/// An immutable, validated buffer of mono audio samples
///
/// Construction is the single validation point for raw input: every
/// downstream component may assume a non-empty, all-finite signal with a
/// positive sample rate.
#[derive(Debug, Clone)]
pub struct SampleBuffer {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl SampleBuffer {
    /// Create a buffer from raw samples
    ///
    /// # Arguments
    ///
    /// * `samples` - Mono audio samples, normalized to [-1.0, 1.0]
    /// * `sample_rate` - Sample rate in Hz
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` if the buffer is empty, the
    /// sample rate is zero, or any sample is NaN/infinite.
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Result<Self, AnalysisError> {
        if samples.is_empty() {
            return Err(AnalysisError::InvalidInput(
                "Empty audio samples".to_string(),
            ));
        }

        if sample_rate == 0 {
            return Err(AnalysisError::InvalidInput(
                "Invalid sample rate: 0".to_string(),
            ));
        }

        if let Some(pos) = samples.iter().position(|x| !x.is_finite()) {
            return Err(AnalysisError::InvalidInput(format!(
                "Non-finite sample at index {}",
                pos
            )));
        }

        Ok(Self {
            samples,
            sample_rate,
        })
    }

    /// Audio samples
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false: construction rejects empty buffers
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Total duration in seconds
    pub fn duration_seconds(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate as f32
    }
}
