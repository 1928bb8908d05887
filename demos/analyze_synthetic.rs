//! Example: analyze a synthetic track and print its timing description
//!
//! Decoding real audio files is a caller concern; this example synthesizes
//! a 120 BPM click track with a tonal change halfway through and runs the
//! full pipeline on it.

use cadence_dsp::{analyze_samples, render_timing_description, AnalysisConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let sample_rate = 44100u32;
    let seconds = 12.0f32;
    let n = (seconds * sample_rate as f32) as usize;
    let beat_interval = (sample_rate as f32 / 2.0) as usize;

    // Click bed over a drone that changes pitch at the halfway point
    let samples: Vec<f32> = (0..n)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            let freq = if t < seconds / 2.0 { 220.0 } else { 330.0 };
            let drone = 0.2 * (2.0 * std::f32::consts::PI * freq * t).sin();
            let since_beat = (i % beat_interval) as f32 / sample_rate as f32;
            let click = 0.6
                * (-since_beat * 80.0).exp()
                * (2.0 * std::f32::consts::PI * 1000.0 * since_beat).sin();
            drone + click
        })
        .collect();

    let config = AnalysisConfig {
        segment_count: 2,
        ..Default::default()
    };
    let result = analyze_samples(&samples, sample_rate, config)?;

    println!("Analysis results:");
    println!("  Tempo: {:.2} BPM", result.tempo_bpm);
    println!("  Beats: {}", result.beats.len());
    println!("  Onsets: {}", result.onsets.len());
    println!("  Sections: {}", result.section_count());
    println!("  Energy peaks: {}", result.energy_peaks.len());
    println!("  Processing time: {:.2} ms", result.metadata.processing_time_ms);
    println!();
    println!("{}", render_timing_description(&result));

    Ok(())
}
