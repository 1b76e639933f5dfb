//! Benchmarks for complete voices and the mixed graph.

mod graph;
mod voices;

pub use graph::bench_graph;
pub use voices::bench_voices;
