//! Benchmarks for the state-variable filter.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use tactical_audio::dsp::SVFilter;

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");

    for &size in BLOCK_SIZES {
        // Sawtooth-like ramp
        let input: Vec<f32> = (0..size)
            .map(|i| (i as f32 / size as f32) * 2.0 - 1.0)
            .collect();

        let mut filter = SVFilter::lowpass();
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("lowpass", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                filter.render(black_box(&mut buffer), black_box(1_000.0), SAMPLE_RATE);
            })
        });

        // Swept cutoff: coefficient recomputed every sample
        let mut filter = SVFilter::lowpass();
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("lowpass_swept", size), &size, |b, _| {
            b.iter(|| {
                for (i, sample) in buffer.iter_mut().enumerate() {
                    let cutoff = 200.0 + i as f32;
                    *sample = filter.next_sample(input[i], cutoff, SAMPLE_RATE);
                }
                black_box(&buffer);
            })
        });

        let mut filter = SVFilter::highpass();
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("highpass", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                filter.render(black_box(&mut buffer), black_box(6_000.0), SAMPLE_RATE);
            })
        });
    }

    group.finish();
}
