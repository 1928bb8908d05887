//! Timing description rendering
//!
//! Renders a fully populated [`AnalysisResult`] into the plain-text timing
//! description used as a conditioning signal for downstream generation or
//! retrieval. Pure string formatting over the result; no computation, no
//! I/O.

use std::fmt::Write;

use crate::analysis::result::AnalysisResult;

/// Render the timing description for an analysis result
pub fn render_timing_description(result: &AnalysisResult) -> String {
    let mut text = String::new();

    let minutes = (result.duration_seconds / 60.0).floor();
    let seconds = result.duration_seconds % 60.0;

    let _ = writeln!(
        text,
        "This song has a tempo of approximately {:.1} BPM (beats per minute).",
        result.tempo_bpm
    );
    let _ = writeln!(
        text,
        "It has a duration of {:.0} minutes and {:.0} seconds.",
        minutes, seconds
    );
    let _ = writeln!(text);

    let _ = writeln!(text, "The song contains {} beats.", result.beats.len());
    let _ = writeln!(
        text,
        "The song can be divided into {} distinct sections based on harmonic changes.",
        result.section_count()
    );

    let _ = writeln!(text, "Key timing markers (in seconds):");
    let _ = writeln!(text, "- Start: 0.0");
    for boundary in &result.segment_boundaries {
        let _ = writeln!(text, "- Section change at: {:.2}", boundary.time_seconds);
    }

    if !result.energy_peaks.is_empty() {
        let _ = writeln!(text);
        let _ = writeln!(
            text,
            "Significant dynamic changes (potential chorus/drop sections):"
        );
        for peak in &result.energy_peaks {
            let _ = writeln!(text, "- Energy peak at: {:.2} seconds", peak.time_seconds);
        }
    }

    let _ = writeln!(text);
    let _ = writeln!(text, "Detailed RMS Energy Analysis (second by second):");
    for (second, energy) in result.rms_per_second.iter().enumerate() {
        let _ = writeln!(text, "- Second {}: RMS Energy = {:.6}", second, energy);
    }

    if !result.metadata.notes.is_empty() {
        let _ = writeln!(text);
        let _ = writeln!(text, "Analysis notes:");
        for note in &result.metadata.notes {
            let _ = writeln!(text, "- {}", note);
        }
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::result::{
        AnalysisMetadata, Event, EventKind, RmsSeries,
    };

    fn sample_result() -> AnalysisResult {
        AnalysisResult {
            tempo_bpm: 120.2,
            beats: vec![
                Event::new(0.5, EventKind::Beat),
                Event::new(1.0, EventKind::Beat),
            ],
            onsets: vec![Event::new(0.5, EventKind::Onset)],
            segment_boundaries: vec![Event::new(4.99, EventKind::SegmentBoundary)],
            energy_peaks: vec![Event::new(2.25, EventKind::EnergyPeak)],
            rms: RmsSeries {
                times: vec![0.0, 1.0],
                energy: vec![0.25, 0.5],
            },
            rms_per_second: vec![0.25, 0.5],
            duration_seconds: 125.0,
            metadata: AnalysisMetadata {
                sample_rate: 44100,
                processing_time_ms: 10.0,
                algorithm_version: "0.1.0".to_string(),
                flags: vec![],
                notes: vec![],
            },
        }
    }

    #[test]
    fn test_report_mentions_tempo_and_duration() {
        let text = render_timing_description(&sample_result());
        assert!(text.contains("approximately 120.2 BPM"));
        assert!(text.contains("2 minutes and 5 seconds"));
    }

    #[test]
    fn test_report_counts_sections_and_beats() {
        let text = render_timing_description(&sample_result());
        assert!(text.contains("contains 2 beats"));
        assert!(text.contains("2 distinct sections"));
        assert!(text.contains("- Section change at: 4.99"));
    }

    #[test]
    fn test_report_lists_peaks_and_per_second_energy() {
        let text = render_timing_description(&sample_result());
        assert!(text.contains("- Energy peak at: 2.25 seconds"));
        assert!(text.contains("- Second 0: RMS Energy = 0.250000"));
        assert!(text.contains("- Second 1: RMS Energy = 0.500000"));
    }

    #[test]
    fn test_report_omits_peak_section_when_empty() {
        let mut result = sample_result();
        result.energy_peaks.clear();
        let text = render_timing_description(&result);
        assert!(!text.contains("Significant dynamic changes"));
    }

    #[test]
    fn test_report_surfaces_notes() {
        let mut result = sample_result();
        result
            .metadata
            .notes
            .push("No measurable periodicity; tempo defaulted to 120.0 BPM".to_string());
        let text = render_timing_description(&result);
        assert!(text.contains("Analysis notes:"));
        assert!(text.contains("tempo defaulted"));
    }
}
