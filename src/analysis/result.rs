//! Analysis result types

use serde::{Deserialize, Serialize};

/// Kind of a timed analysis event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// Beat position from the beat tracker
    Beat,
    /// Note/percussion onset
    Onset,
    /// Harmonic section boundary
    SegmentBoundary,
    /// High-energy RMS peak (candidate chorus/drop)
    EnergyPeak,
}

/// A timed event
///
/// Events of one kind form a strictly increasing sequence, produced once by
/// their component and never mutated afterward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Event time in seconds from the start of the signal
    pub time_seconds: f32,

    /// Event kind
    pub kind: EventKind,
}

impl Event {
    /// Create an event
    pub fn new(time_seconds: f32, kind: EventKind) -> Self {
        Self { time_seconds, kind }
    }
}

/// RMS energy over time
///
/// `times` and `energy` are parallel vectors on the shared frame axis;
/// energy values are always >= 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RmsSeries {
    /// Frame timestamps in seconds
    pub times: Vec<f32>,

    /// RMS energy per frame
    pub energy: Vec<f32>,
}

impl RmsSeries {
    /// Number of frames
    pub fn len(&self) -> usize {
        self.energy.len()
    }

    /// True when the series holds no frames
    pub fn is_empty(&self) -> bool {
        self.energy.is_empty()
    }

    /// Mean energy over the series (0.0 when empty)
    pub fn mean(&self) -> f32 {
        if self.energy.is_empty() {
            0.0
        } else {
            self.energy.iter().sum::<f32>() / self.energy.len() as f32
        }
    }
}

/// Degenerate-analysis flags
///
/// Component fallbacks are recorded here so silent degradation is
/// observable; each flag has a matching human-readable note in
/// [`AnalysisMetadata::notes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnalysisFlag {
    /// Envelope carried no periodicity; tempo fell back to the prior mode
    TempoFallback,
    /// No beats could be placed (flat envelope)
    EmptyBeatGrid,
    /// All chroma frames identical; segmentation collapsed to one segment
    DegenerateSegmentation,
    /// Requested segment count exceeded the frame count and was clamped
    SegmentCountClamped,
}

/// Analysis metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    /// Sample rate in Hz
    pub sample_rate: u32,

    /// Processing time in milliseconds
    pub processing_time_ms: f32,

    /// Algorithm version
    pub algorithm_version: String,

    /// Degenerate-analysis flags
    pub flags: Vec<AnalysisFlag>,

    /// Human-readable notes explaining each flag
    pub notes: Vec<String>,
}

/// Complete timing analysis result
///
/// Created once per input and read-only thereafter; all frame-rate features
/// share one time axis, so indices line up across the RMS series and the
/// event sequences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Tempo estimate in BPM
    pub tempo_bpm: f32,

    /// Beat events
    pub beats: Vec<Event>,

    /// Onset events
    pub onsets: Vec<Event>,

    /// Harmonic section boundary events
    pub segment_boundaries: Vec<Event>,

    /// Energy peak events
    pub energy_peaks: Vec<Event>,

    /// RMS energy over time
    pub rms: RmsSeries,

    /// Nearest RMS energy for each whole second of the signal
    pub rms_per_second: Vec<f32>,

    /// Signal duration in seconds
    pub duration_seconds: f32,

    /// Analysis metadata
    pub metadata: AnalysisMetadata,
}

impl AnalysisResult {
    /// Number of events of the given kind
    pub fn event_count(&self, kind: EventKind) -> usize {
        match kind {
            EventKind::Beat => self.beats.len(),
            EventKind::Onset => self.onsets.len(),
            EventKind::SegmentBoundary => self.segment_boundaries.len(),
            EventKind::EnergyPeak => self.energy_peaks.len(),
        }
    }

    /// Number of harmonic sections (boundaries + 1)
    pub fn section_count(&self) -> usize {
        self.segment_boundaries.len() + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rms_series_mean() {
        let series = RmsSeries {
            times: vec![0.0, 0.5, 1.0],
            energy: vec![0.2, 0.4, 0.6],
        };
        assert!((series.mean() - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_empty_rms_series_mean_is_zero() {
        let series = RmsSeries {
            times: vec![],
            energy: vec![],
        };
        assert_eq!(series.mean(), 0.0);
        assert!(series.is_empty());
    }

    #[test]
    fn test_event_ordering_helpers() {
        let event = Event::new(1.5, EventKind::Beat);
        assert_eq!(event.kind, EventKind::Beat);
        assert_eq!(event.time_seconds, 1.5);
    }
}
