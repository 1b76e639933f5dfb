//! Themes, rhythm patterns and the look-ahead step sequencer.

pub mod rhythm;
pub mod sequencer;
pub mod theme;

pub use rhythm::{Hit, AMBIENT_OPEN_HAT, AMBIENT_SECOND_KICK};
pub use sequencer::{step_duration, Event, Note, Position, Sequencer, STEPS_PER_BAR};
pub use theme::{Chord, Progression, Screen, Theme};
