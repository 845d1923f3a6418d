//! Performance benchmarks for clip detection

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use stratum_clipcut::matching::correlation::cross_correlate_full;
use stratum_clipcut::{remove_reference_clips, ReferenceClip, RemovalConfig, Waveform};

const SAMPLE_RATE: u32 = 44100;

/// Two seconds of a slow decaying chirp with short silences on both sides
fn jingle() -> Vec<f32> {
    let mut samples = vec![0.0f32; 2205];
    samples.extend((0..SAMPLE_RATE as usize * 2).map(|i| {
        let t = i as f32 / SAMPLE_RATE as f32;
        (2.0 * std::f32::consts::PI * (110.0 + 40.0 * t) * t).sin() * 0.8 * (-t).exp()
    }));
    samples.extend(vec![0.0f32; 2205]);
    samples
}

/// Sixty seconds of low tone with the jingle pasted every twenty seconds
fn recording(jingle: &[f32]) -> Vec<f32> {
    let mut samples: Vec<f32> = (0..SAMPLE_RATE as usize * 60)
        .map(|i| (i as f32 * 110.0 * 2.0 * std::f32::consts::PI / SAMPLE_RATE as f32).sin() * 0.05)
        .collect();
    for k in 0..3 {
        let offset = SAMPLE_RATE as usize * (5 + 20 * k);
        samples[offset..offset + jingle.len()].copy_from_slice(jingle);
    }
    samples
}

fn bench_cross_correlation(c: &mut Criterion) {
    let jingle = jingle();
    let recording = recording(&jingle);

    c.bench_function("cross_correlate_60s", |b| {
        b.iter(|| {
            let _ = cross_correlate_full(black_box(&recording), black_box(&jingle));
        });
    });
}

fn bench_remove_reference_clips(c: &mut Criterion) {
    let jingle = jingle();
    let recording = recording(&jingle);
    // 20 s windows so the run spans several of them
    let config = RemovalConfig {
        chunk_minutes: 1.0 / 3.0,
        ..Default::default()
    };

    c.bench_function("remove_reference_clips_60s", |b| {
        b.iter(|| {
            let clip = ReferenceClip::new("jingle", Waveform::new(jingle.clone(), SAMPLE_RATE))
                .expect("jingle has audible content");
            let _ = remove_reference_clips(
                black_box(Waveform::new(recording.clone(), SAMPLE_RATE)),
                vec![clip],
                black_box(config.clone()),
                true,
            );
        });
    });
}

criterion_group!(benches, bench_cross_correlation, bench_remove_reference_clips);
criterion_main!(benches);
