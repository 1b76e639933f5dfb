//! Benchmark for the full render path: command drain, bus mixing, master
//! gain automation and compression under a dense action groove.

use std::hint::black_box;

use criterion::{BatchSize, BenchmarkId, Criterion};
use tactical_audio::{
    config::EngineConfig,
    graph::{audio_graph, Bus, GraphController, GraphRenderer},
    sequencing::theme::D_DRONE,
    synth::Fixed,
    voices,
};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

/// A bar's worth of overlapping action-theme voices plus a pad
fn busy_graph() -> (GraphController, GraphRenderer) {
    let (mut controller, renderer) = audio_graph(&EngineConfig::default(), SAMPLE_RATE);
    for step in 0..16 {
        let t = step as f64 * 0.005;
        controller.play(Bus::Bgm, Box::new(voices::kick(t)));
        controller.play(Bus::Bgm, Box::new(voices::hat(t, step % 4 == 2)));
        controller.play(Bus::Bgm, Box::new(voices::sub_bass(t, 36.71)));
    }
    controller.play(
        Bus::Bgm,
        Box::new(voices::pad(0.0, D_DRONE.tones(), &mut Fixed(0.5))),
    );
    controller.ramp_master(0.0, 0.0, 0.1);
    (controller, renderer)
}

pub fn bench_graph(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/graph");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];
        group.bench_with_input(BenchmarkId::new("action_bar", size), &size, |b, _| {
            b.iter_batched_ref(
                busy_graph,
                |(_, renderer)| renderer.render(black_box(&mut buffer)),
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}
