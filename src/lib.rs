//! # Cadence DSP
//!
//! A timing-structure analysis engine for music audio: extracts tempo, beat
//! positions, onset events, harmonic section boundaries and
//! loudness-over-time from one fully-loaded sample buffer, and renders the
//! outputs into a textual description usable as a conditioning signal for
//! downstream generation or retrieval.
//!
//! ## Features
//!
//! - **Tempo + beats**: prior-weighted autocorrelation tempo estimate with
//!   dynamic-programming beat placement
//! - **Onsets**: spectral-flux envelope with adaptive peak picking
//! - **Sections**: contiguity-constrained agglomerative clustering over
//!   chroma frames
//! - **Loudness**: frame RMS with energy-peak detection
//!
//! ## Quick Start
//!
//! ```
//! use cadence_dsp::{analyze_samples, AnalysisConfig};
//!
//! // Mono samples, normalized to [-1.0, 1.0]
//! let samples = vec![0.0f32; 44100];
//! let result = analyze_samples(&samples, 44100, AnalysisConfig::default())?;
//!
//! println!("Tempo: {:.1} BPM, {} beats", result.tempo_bpm, result.beats.len());
//! # Ok::<(), cadence_dsp::AnalysisError>(())
//! ```
//!
//! ## Architecture
//!
//! The analysis pipeline flows one way:
//!
//! ```text
//! samples -> spectral frontend -> { onset detector, segmenter } -> beat tracker
//! samples -> loudness analyzer
//! all outputs -> aggregator -> AnalysisResult -> report
//! ```
//!
//! A single run is pure, synchronous and single-threaded over one immutable
//! buffer; callers may analyze different buffers concurrently.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod config;
pub mod error;
pub mod features;
pub mod io;
pub mod report;

// Re-export main types
pub use analysis::result::{
    AnalysisFlag, AnalysisMetadata, AnalysisResult, Event, EventKind, RmsSeries,
};
pub use config::AnalysisConfig;
pub use error::AnalysisError;
pub use io::SampleBuffer;
pub use report::render_timing_description;

use features::onset::OnsetPicker;

/// Moving-average width (frames) applied to the onset envelope
const ONSET_SMOOTHING_FRAMES: usize = 3;

/// Main analysis function
///
/// Runs the full timing analysis over one buffer of samples and returns the
/// aggregated result. Degenerate inputs (silence, pure noise) resolve to
/// documented fallbacks recorded in the result metadata; they never fail.
///
/// # Arguments
///
/// * `samples` - Mono audio samples, normalized to [-1.0, 1.0]
/// * `sample_rate` - Sample rate in Hz (typically 44100 or 48000)
/// * `config` - Analysis configuration parameters
///
/// # Returns
///
/// `AnalysisResult` containing tempo, beat/onset/section/peak events, the
/// RMS series with its per-second view, duration and metadata.
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` for an empty buffer, a zero sample
/// rate, non-finite samples, or invalid configuration.
///
/// # Example
///
/// ```
/// use cadence_dsp::{analyze_samples, AnalysisConfig};
///
/// let samples = vec![0.0f32; 44100 * 2];
/// let result = analyze_samples(&samples, 44100, AnalysisConfig::default())?;
/// assert!(result.tempo_bpm > 0.0);
/// # Ok::<(), cadence_dsp::AnalysisError>(())
/// ```
pub fn analyze_samples(
    samples: &[f32],
    sample_rate: u32,
    config: AnalysisConfig,
) -> Result<AnalysisResult, AnalysisError> {
    use std::time::Instant;
    let start_time = Instant::now();

    config.validate()?;
    let buffer = SampleBuffer::new(samples.to_vec(), sample_rate)?;

    log::debug!(
        "Starting timing analysis: {} samples at {} Hz ({:.2} s)",
        buffer.len(),
        sample_rate,
        buffer.duration_seconds()
    );

    // Spectral frontend: magnitude spectrogram + chroma on a shared axis
    let (spectrogram, axis) = features::spectral::stft::magnitude_spectrogram(
        buffer.samples(),
        sample_rate,
        config.frame_length,
        config.hop_length,
    )?;
    let chroma = features::spectral::chroma::chroma_from_spectrogram(
        &spectrogram,
        sample_rate,
        config.frame_length,
    )?;

    // Onset detection
    let envelope = features::onset::onset_envelope(&spectrogram, ONSET_SMOOTHING_FRAMES)?;
    let picker = OnsetPicker {
        min_separation: axis
            .frames_spanning(config.onset_min_separation_seconds)
            .max(1),
        ..Default::default()
    };
    let onset_frames = features::onset::pick_onsets(&envelope, &picker);

    // Tempo estimation and beat placement
    let tempo = features::period::estimate_tempo(
        &envelope,
        axis.frame_rate(),
        config.min_bpm,
        config.max_bpm,
        config.tempo_prior_bpm,
        config.tempo_prior_octaves,
    )?;
    let beat_frames = if tempo.fallback {
        Vec::new()
    } else {
        features::beat_tracking::track_beats(
            &envelope,
            axis.frame_rate(),
            tempo.bpm,
            config.beat_tightness,
        )?
    };

    // Harmonic segmentation
    let segmentation = features::segmentation::segment_frames(&chroma, config.segment_count)?;

    // Loudness
    let rms = features::loudness::rms_envelope(buffer.samples(), &axis, config.frame_length)?;
    let peak_gap = axis.frames_spanning(config.peak_min_gap_seconds).max(1);
    let peak_frames =
        features::loudness::pick_energy_peaks(&rms, config.peak_threshold_factor, peak_gap);

    let processing_time_ms = start_time.elapsed().as_secs_f32() * 1000.0;

    Ok(analysis::aggregator::assemble_result(
        &buffer,
        &axis,
        &tempo,
        &beat_frames,
        &onset_frames,
        &segmentation,
        rms,
        &peak_frames,
        processing_time_ms,
    ))
}
