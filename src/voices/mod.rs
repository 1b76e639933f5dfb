//! Instrument and effect recipes.
//!
//! Every recipe returns a [`Voice`](crate::synth::Voice) with absolute
//! start and stop times, ready to hand to the graph.
//!
//! # Example
//!
//! ```
//! use tactical_audio::voices;
//!
//! // Backing track
//! let kick = voices::kick(1.0);
//! let hat = voices::hat(1.0, false);
//! let bass = voices::sub_bass(1.0, 73.42);
//!
//! assert!((kick.end_time() - 1.4).abs() < 1e-9);
//! assert!((hat.end_time() - 1.3).abs() < 1e-9);
//! assert_eq!(bass.layers().len(), 2);
//! ```

mod effects;
mod hat;
mod kick;
mod pad;
mod sub_bass;

pub use effects::{Effect, UnknownEffect};
pub use hat::hat;
pub use kick::kick;
pub use pad::pad;
pub use sub_bass::sub_bass;
