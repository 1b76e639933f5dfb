//! Benchmarks for instrument and effect voices.
//!
//! Each voice is rebuilt per iteration batch so it is always rendered inside
//! its sounding window, never as trailing silence.

use std::hint::black_box;

use criterion::{BatchSize, BenchmarkId, Criterion};
use tactical_audio::{
    dsp::NoiseBuffer,
    graph::{GraphNode, RenderCtx},
    sequencing::theme::DM9,
    synth::{Fixed, Voice},
    voices::{self, Effect},
};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_voices(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voices");
    let ctx = RenderCtx::new(SAMPLE_RATE, 0.1);
    let noise = NoiseBuffer::white(SAMPLE_RATE as usize, SAMPLE_RATE, &mut fastrand::Rng::with_seed(1));

    let (boot_noise, level_noise) = (noise.clone(), noise);

    let recipes: [(&str, Box<dyn Fn() -> Voice>); 6] = [
        ("kick", Box::new(|| voices::kick(0.0))),
        ("hat", Box::new(|| voices::hat(0.0, true))),
        ("sub_bass", Box::new(|| voices::sub_bass(0.0, 73.42))),
        // Four filtered oscillators: the most expensive backing voice
        ("pad", Box::new(|| voices::pad(0.0, DM9.tones(), &mut Fixed(0.5)))),
        ("boot", Box::new(move || Effect::Boot.voice(0.0, &boot_noise))),
        ("level_up", Box::new(move || Effect::LevelUp.voice(0.0, &level_noise))),
    ];

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        for (name, build) in &recipes {
            group.bench_with_input(BenchmarkId::new(*name, size), &size, |b, _| {
                b.iter_batched_ref(
                    build,
                    |voice| voice.render_block(black_box(&mut buffer), &ctx),
                    BatchSize::SmallInput,
                )
            });
        }
    }

    group.finish();
}
