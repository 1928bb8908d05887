//! Configuration parameters for timing analysis

use crate::error::AnalysisError;

/// Analysis configuration parameters
///
/// All values have musically sensible defaults; pass a modified copy to
/// [`crate::analyze_samples`] to override them for one invocation. The
/// pipeline holds no process-wide state.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    // STFT parameters
    /// Frame length in samples for spectral analysis (default: 2048)
    pub frame_length: usize,

    /// Hop length in samples between consecutive frames (default: 512)
    pub hop_length: usize,

    // Tempo search
    /// Minimum BPM to consider (default: 50.0)
    pub min_bpm: f32,

    /// Maximum BPM to consider (default: 220.0)
    pub max_bpm: f32,

    /// Center of the log-normal tempo prior in BPM (default: 120.0)
    ///
    /// Also the fallback tempo reported for degenerate input (silence,
    /// constant noise) where no periodicity can be measured.
    pub tempo_prior_bpm: f32,

    /// Spread of the tempo prior in octaves (default: 1.0)
    pub tempo_prior_octaves: f32,

    // Beat placement
    /// Tightness of the beat-spacing penalty (default: 100.0)
    ///
    /// Higher values force beats closer to the estimated tempo period;
    /// lower values let beats follow local onset strength more freely.
    pub beat_tightness: f32,

    // Onset picking
    /// Minimum separation between reported onsets in seconds (default: 0.05)
    pub onset_min_separation_seconds: f32,

    // Segmentation
    /// Target number of harmonic segments (default: 10)
    ///
    /// Clamped to the frame count when the input is shorter than one frame
    /// per requested segment.
    pub segment_count: usize,

    // Loudness peaks
    /// An RMS frame must exceed `mean(RMS) * peak_threshold_factor` to be
    /// reported as an energy peak (default: 1.2)
    pub peak_threshold_factor: f32,

    /// Minimum gap between reported energy peaks in seconds (default: 0.1)
    pub peak_min_gap_seconds: f32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            frame_length: 2048,
            hop_length: 512,
            min_bpm: 50.0,
            max_bpm: 220.0,
            tempo_prior_bpm: 120.0,
            tempo_prior_octaves: 1.0,
            beat_tightness: 100.0,
            onset_min_separation_seconds: 0.05,
            segment_count: 10,
            peak_threshold_factor: 1.2,
            peak_min_gap_seconds: 0.1,
        }
    }
}

impl AnalysisConfig {
    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` for zero frame/hop lengths, an
    /// empty or inverted BPM range, a prior outside the search range, or
    /// non-positive thresholds.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.frame_length == 0 {
            return Err(AnalysisError::InvalidInput(
                "Frame length must be > 0".to_string(),
            ));
        }

        if self.hop_length == 0 {
            return Err(AnalysisError::InvalidInput(
                "Hop length must be > 0".to_string(),
            ));
        }

        if self.min_bpm <= 0.0 || self.max_bpm <= 0.0 || self.min_bpm >= self.max_bpm {
            return Err(AnalysisError::InvalidInput(format!(
                "Invalid BPM range: [{:.1}, {:.1}]",
                self.min_bpm, self.max_bpm
            )));
        }

        if self.tempo_prior_bpm < self.min_bpm || self.tempo_prior_bpm > self.max_bpm {
            return Err(AnalysisError::InvalidInput(format!(
                "Tempo prior {:.1} BPM outside search range [{:.1}, {:.1}]",
                self.tempo_prior_bpm, self.min_bpm, self.max_bpm
            )));
        }

        if self.tempo_prior_octaves <= 0.0 {
            return Err(AnalysisError::InvalidInput(
                "Tempo prior spread must be > 0".to_string(),
            ));
        }

        if self.beat_tightness <= 0.0 {
            return Err(AnalysisError::InvalidInput(
                "Beat tightness must be > 0".to_string(),
            ));
        }

        if self.onset_min_separation_seconds < 0.0 {
            return Err(AnalysisError::InvalidInput(
                "Onset separation must be >= 0".to_string(),
            ));
        }

        if self.segment_count == 0 {
            return Err(AnalysisError::InvalidInput(
                "Segment count must be > 0".to_string(),
            ));
        }

        if self.peak_threshold_factor <= 0.0 {
            return Err(AnalysisError::InvalidInput(
                "Peak threshold factor must be > 0".to_string(),
            ));
        }

        if self.peak_min_gap_seconds < 0.0 {
            return Err(AnalysisError::InvalidInput(
                "Peak gap must be >= 0".to_string(),
            ));
        }

        Ok(())
    }
}
