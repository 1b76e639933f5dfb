use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use tactical_audio::dsp::{Oscillator, Waveform};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        for (name, waveform) in [
            ("sine", Waveform::Sine),
            ("triangle", Waveform::Triangle),
            ("sawtooth", Waveform::Sawtooth),
            ("square", Waveform::Square),
        ] {
            let mut osc = Oscillator::new(waveform);
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    for sample in buffer.iter_mut() {
                        *sample = osc.next_sample(black_box(440.0), SAMPLE_RATE);
                    }
                    black_box(&buffer);
                })
            });
        }
    }

    group.finish();
}
