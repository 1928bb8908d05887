//! Feature aggregation
//!
//! Assembles all component outputs into one [`AnalysisResult`] keyed by the
//! shared frame axis. Pure bookkeeping: frame-to-time conversion, duration,
//! per-second energy view, and fallback-flag collection. No new signal
//! computation happens here.

use super::result::{
    AnalysisFlag, AnalysisMetadata, AnalysisResult, Event, EventKind, RmsSeries,
};
use crate::features::period::TempoEstimate;
use crate::features::segmentation::Segmentation;
use crate::features::spectral::FrameAxis;
use crate::io::SampleBuffer;

/// Assemble the final analysis result
#[allow(clippy::too_many_arguments)]
pub fn assemble_result(
    buffer: &SampleBuffer,
    axis: &FrameAxis,
    tempo: &TempoEstimate,
    beat_frames: &[usize],
    onset_frames: &[usize],
    segmentation: &Segmentation,
    rms_energy: Vec<f32>,
    peak_frames: &[usize],
    processing_time_ms: f32,
) -> AnalysisResult {
    let duration_seconds = buffer.duration_seconds();

    let to_events = |frames: &[usize], kind: EventKind| -> Vec<Event> {
        frames
            .iter()
            .map(|&i| Event::new(axis.time(i), kind))
            .collect()
    };

    let beats = to_events(beat_frames, EventKind::Beat);
    let onsets = to_events(onset_frames, EventKind::Onset);
    let segment_boundaries = to_events(&segmentation.boundaries, EventKind::SegmentBoundary);
    let energy_peaks = to_events(peak_frames, EventKind::EnergyPeak);

    let rms = RmsSeries {
        times: axis.times(),
        energy: rms_energy,
    };
    let rms_per_second = nearest_rms_per_second(&rms, duration_seconds);

    let mut flags = Vec::new();
    let mut notes = Vec::new();

    if tempo.fallback {
        flags.push(AnalysisFlag::TempoFallback);
        notes.push(format!(
            "No measurable periodicity; tempo defaulted to {:.1} BPM",
            tempo.bpm
        ));
    }
    if beats.is_empty() {
        flags.push(AnalysisFlag::EmptyBeatGrid);
        notes.push("Onset envelope too flat to place beats".to_string());
    }
    if segmentation.degenerate {
        flags.push(AnalysisFlag::DegenerateSegmentation);
        notes.push(
            "All chroma frames identical; reporting a single harmonic section".to_string(),
        );
    }
    if segmentation.clamped {
        flags.push(AnalysisFlag::SegmentCountClamped);
        notes.push("Requested segment count exceeded frame count and was clamped".to_string());
    }

    log::debug!(
        "Assembled result: {:.1} BPM, {} beats, {} onsets, {} boundaries, {} peaks, {} flags",
        tempo.bpm,
        beats.len(),
        onsets.len(),
        segment_boundaries.len(),
        energy_peaks.len(),
        flags.len()
    );

    AnalysisResult {
        tempo_bpm: tempo.bpm,
        beats,
        onsets,
        segment_boundaries,
        energy_peaks,
        rms,
        rms_per_second,
        duration_seconds,
        metadata: AnalysisMetadata {
            sample_rate: buffer.sample_rate(),
            processing_time_ms,
            algorithm_version: env!("CARGO_PKG_VERSION").to_string(),
            flags,
            notes,
        },
    }
}

/// Nearest RMS energy for each whole second in `[0, ceil(duration))`
///
/// For each integer second the entry whose timestamp is closest wins; ties
/// go to the earlier timestamp. The lookup reads only the series, so
/// re-running it against an unchanged series is idempotent.
pub fn nearest_rms_per_second(rms: &RmsSeries, duration_seconds: f32) -> Vec<f32> {
    if rms.is_empty() {
        return Vec::new();
    }

    let seconds = duration_seconds.ceil().max(1.0) as usize;

    (0..seconds)
        .map(|second| {
            let target = second as f32;
            let mut best_idx = 0usize;
            let mut best_dist = f32::INFINITY;
            for (i, &t) in rms.times.iter().enumerate() {
                let dist = (t - target).abs();
                // Strict improvement only: ties keep the earlier timestamp
                if dist < best_dist {
                    best_dist = dist;
                    best_idx = i;
                }
            }
            rms.energy[best_idx]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(times: Vec<f32>, energy: Vec<f32>) -> RmsSeries {
        RmsSeries { times, energy }
    }

    #[test]
    fn test_per_second_picks_nearest() {
        let rms = series(vec![0.0, 0.4, 0.9, 1.6, 2.1], vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        let view = nearest_rms_per_second(&rms, 2.5);
        // Second 0 -> t=0.0, second 1 -> t=0.9, second 2 -> t=2.1
        assert_eq!(view, vec![1.0, 3.0, 5.0]);
    }

    #[test]
    fn test_per_second_tie_goes_to_earlier() {
        let rms = series(vec![0.5, 1.5], vec![10.0, 20.0]);
        let view = nearest_rms_per_second(&rms, 2.0);
        // Second 1 is equidistant from 0.5 and 1.5; earlier wins
        assert_eq!(view[1], 10.0);
    }

    #[test]
    fn test_per_second_idempotent() {
        let rms = series(
            (0..200).map(|i| i as f32 * 0.0116).collect(),
            (0..200).map(|i| (i % 17) as f32 * 0.01).collect(),
        );
        let first = nearest_rms_per_second(&rms, 2.32);
        let second = nearest_rms_per_second(&rms, 2.32);
        assert_eq!(first, second);
    }

    #[test]
    fn test_per_second_covers_ceil_of_duration() {
        let rms = series(vec![0.0, 1.0, 2.0, 3.0], vec![0.1, 0.2, 0.3, 0.4]);
        let view = nearest_rms_per_second(&rms, 3.2);
        assert_eq!(view.len(), 4);
    }

    #[test]
    fn test_per_second_empty_series() {
        let rms = series(vec![], vec![]);
        assert!(nearest_rms_per_second(&rms, 5.0).is_empty());
    }
}
