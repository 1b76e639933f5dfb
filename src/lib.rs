pub mod config;
pub mod dsp;
pub mod engine; // Engine facade, scheduler task, host seam
pub mod error;
pub mod graph; // Bus topology and render side
pub mod io;
pub mod sequencing; // Themes, rhythm and the look-ahead sequencer
pub mod synth; // One-shot voices
pub mod voices;

pub use config::EngineConfig;
pub use engine::{AudioEngine, AudioHost, EngineStatus};
pub use error::EngineError;
pub use sequencing::{Screen, Theme};
pub use voices::Effect;

pub const MAX_BLOCK_SIZE: usize = 2048;
pub(crate) const MIN_TIME: f64 = 1.0 / 48_000.0;
