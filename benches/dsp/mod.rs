//! Benchmarks for low-level DSP primitives.

mod compressor;
mod envelope;
mod filter;
mod oscillator;

pub use compressor::bench_compressor;
pub use envelope::bench_envelope;
pub use filter::bench_filter;
pub use oscillator::bench_oscillator;
