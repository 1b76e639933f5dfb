// Purpose: one-shot voices and the randomness their recipes draw on
// This layer sits between the DSP primitives and the graph

pub mod random;
pub mod voice;

pub use random::{Fixed, RandomSource};
pub use voice::{FilterStage, Layer, Source, Voice};
