use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use tactical_audio::dsp::Envelope;

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");
    let period = 1.0 / SAMPLE_RATE as f64;

    // Pad gain: the longest breakpoint list a voice carries
    let pad = Envelope::starting_at(0.0, 0.0)
        .linear_to(0.08, 0.5)
        .linear_to(0.0, 2.5);
    let kick = Envelope::starting_at(0.9, 0.0).exponential_to(0.001, 0.4);
    let mut master = Envelope::constant(0.6);
    master.set_target_at_time(0.0, 0.0, 0.1);

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        for (name, env) in [("linear", &pad), ("exponential", &kick), ("target", &master)] {
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    for (i, sample) in buffer.iter_mut().enumerate() {
                        *sample = env.value_at(black_box(0.25 + i as f64 * period));
                    }
                    black_box(&buffer);
                })
            });
        }
    }

    group.finish();
}
