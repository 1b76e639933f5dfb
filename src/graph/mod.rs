//! The render side of the engine: bus topology, voice mixing and the master
//! chain, plus the control handle used to feed it.
//!
//! Voices are `GraphNode`s routed to a `Bus`. The `mixer` module owns the
//! split between the control thread and the audio thread.

/// The three fixed buses.
pub mod bus;
/// Controller/renderer pair and the audio clock.
pub mod mixer;
/// Core traits shared by all graph nodes.
pub mod node;

pub use bus::Bus;
pub use mixer::{audio_graph, AudioClock, GraphCommand, GraphController, GraphRenderer};
pub use node::{GraphNode, RenderCtx};
