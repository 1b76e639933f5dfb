//! Low-level DSP primitives used by voices and the mixer.
//!
//! These components stay focused on the signal-processing math. Voices own
//! them directly; the graph layer decides when and where they sound.

/// Master bus dynamics.
pub mod compressor;
/// Breakpoint automation for gains, pitches and cutoffs.
pub mod envelope;
/// State-variable filter implementation.
pub mod filter;
/// Oscillator waveforms and noise buffers.
pub mod oscillator;

pub use compressor::Compressor;
pub use envelope::Envelope;
pub use filter::{FilterType, SVFilter};
pub use oscillator::{NoiseBuffer, Oscillator, Waveform};
