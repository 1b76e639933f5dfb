//! In-process host that renders on demand.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::{engine::AudioHost, error::EngineError, graph::GraphRenderer};

#[derive(Default)]
struct Shared {
    renderer: Option<GraphRenderer>,
    attached: usize,
    resumed: usize,
    detached: bool,
}

/// Host without a device: the renderer sits in a shared slot and only
/// advances when the paired [`OfflineHandle`] asks for samples.
///
/// Used for deterministic bounces and for driving the engine in tests.
pub struct OfflineHost {
    sample_rate: u32,
    shared: Arc<Mutex<Shared>>,
}

/// Caller-side view of an [`OfflineHost`]
#[derive(Clone)]
pub struct OfflineHandle {
    shared: Arc<Mutex<Shared>>,
}

impl OfflineHost {
    pub fn new(sample_rate: u32) -> (Self, OfflineHandle) {
        let shared = Arc::new(Mutex::new(Shared::default()));
        let handle = OfflineHandle {
            shared: Arc::clone(&shared),
        };
        (
            Self {
                sample_rate,
                shared,
            },
            handle,
        )
    }
}

fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

impl AudioHost for OfflineHost {
    fn sample_rate(&mut self) -> Result<u32, EngineError> {
        Ok(self.sample_rate)
    }

    fn attach(&mut self, renderer: GraphRenderer) -> Result<(), EngineError> {
        let mut shared = lock(&self.shared);
        if shared.detached {
            return Err(EngineError::Disposed);
        }
        shared.renderer = Some(renderer);
        shared.attached += 1;
        Ok(())
    }

    fn resume(&mut self) -> Result<(), EngineError> {
        let mut shared = lock(&self.shared);
        if shared.detached {
            return Err(EngineError::Disposed);
        }
        shared.resumed += 1;
        Ok(())
    }

    /// Drop the renderer. The host refuses to attach or resume afterwards.
    fn detach(&mut self) {
        let mut shared = lock(&self.shared);
        shared.renderer = None;
        shared.detached = true;
    }
}

impl OfflineHandle {
    /// Render `frames` samples. Silence if nothing is attached.
    pub fn render(&self, frames: usize) -> Vec<f32> {
        let mut out = vec![0.0; frames];
        self.render_into(&mut out);
        out
    }

    /// Render into `out`. Returns false (and leaves `out` untouched) when no
    /// renderer is attached.
    pub fn render_into(&self, out: &mut [f32]) -> bool {
        match lock(&self.shared).renderer.as_mut() {
            Some(renderer) => {
                renderer.render(out);
                true
            }
            None => false,
        }
    }

    /// Number of times a renderer was attached
    pub fn attach_count(&self) -> usize {
        lock(&self.shared).attached
    }

    pub fn resume_count(&self) -> usize {
        lock(&self.shared).resumed
    }

    pub fn is_attached(&self) -> bool {
        lock(&self.shared).renderer.is_some()
    }

    /// Voices held by the renderer (pending or sounding)
    pub fn active_voices(&self) -> usize {
        lock(&self.shared)
            .renderer
            .as_ref()
            .map_or(0, GraphRenderer::active_voices)
    }

    pub fn bus_count(&self) -> usize {
        lock(&self.shared)
            .renderer
            .as_ref()
            .map_or(0, GraphRenderer::bus_count)
    }

    /// Master gain in effect at `time`, if attached
    pub fn master_gain_at(&self, time: f64) -> Option<f32> {
        lock(&self.shared)
            .renderer
            .as_ref()
            .map(|r| r.master_gain_at(time))
    }
}
