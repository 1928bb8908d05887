//! Performance benchmarks for the timing analysis pipeline

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use cadence_dsp::{analyze_samples, AnalysisConfig};

/// 30 seconds of a 120 BPM click bed over a 220 Hz drone
fn synthetic_track(seconds: f32, sample_rate: u32) -> Vec<f32> {
    let n = (seconds * sample_rate as f32) as usize;
    let beat_interval = (sample_rate as f32 / 2.0) as usize;
    (0..n)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            let drone = 0.2 * (2.0 * std::f32::consts::PI * 220.0 * t).sin();
            let since_beat = (i % beat_interval) as f32 / sample_rate as f32;
            let click = 0.6
                * (-since_beat * 80.0).exp()
                * (2.0 * std::f32::consts::PI * 1000.0 * since_beat).sin();
            drone + click
        })
        .collect()
}

fn bench_analyze_samples(c: &mut Criterion) {
    let samples = synthetic_track(30.0, 44100);
    let config = AnalysisConfig::default();

    c.bench_function("analyze_samples_30s", |b| {
        b.iter(|| {
            let _ = analyze_samples(
                black_box(&samples),
                black_box(44100),
                black_box(config.clone()),
            );
        });
    });
}

criterion_group!(benches, bench_analyze_samples);
criterion_main!(benches);
