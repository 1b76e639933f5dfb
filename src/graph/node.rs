/// Context passed to graph nodes during rendering
///
/// Contains information about what to render:
/// - sample_rate: Audio sample rate (e.g., 48000.0)
/// - time: Audio clock time of the first sample in the block (seconds)
#[derive(Debug, Clone, Copy)]
pub struct RenderCtx {
    pub sample_rate: f32,
    pub time: f64,
}

impl RenderCtx {
    pub fn new(sample_rate: f32, time: f64) -> Self {
        Self { sample_rate, time }
    }

    /// Audio clock time of sample `index` within the block
    #[inline]
    pub fn time_of(&self, index: usize) -> f64 {
        self.time + index as f64 / self.sample_rate as f64
    }

    /// Duration of one sample in seconds
    #[inline]
    pub fn sample_period(&self) -> f64 {
        1.0 / self.sample_rate as f64
    }

    /// Context for the block that follows one of `frames` samples
    pub fn advanced(&self, frames: usize) -> Self {
        Self {
            sample_rate: self.sample_rate,
            time: self.time_of(frames),
        }
    }
}

/// Core trait for nodes that render into a bus
///
/// Nodes overwrite `out`; the mixer sums them.
pub trait GraphNode: Send {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx);

    /// Check if this node can still produce sound at or after `time`
    ///
    /// The mixer drops nodes once this turns false.
    fn is_active(&self, _time: f64) -> bool {
        true
    }
}

/// Allow boxed graph nodes to be used as graph nodes (for dynamic dispatch)
impl GraphNode for Box<dyn GraphNode> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        (**self).render_block(out, ctx)
    }

    fn is_active(&self, time: f64) -> bool {
        (**self).is_active(time)
    }
}
