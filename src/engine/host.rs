use crate::{error::EngineError, graph::GraphRenderer};

/// Where the rendered audio goes.
///
/// A host reports its sample rate, takes ownership of the renderer and pulls
/// samples from it on whatever thread it likes. Hosts are used from the
/// thread that owns the engine only, so they need not be `Send`.
pub trait AudioHost {
    /// Sample rate the renderer must run at.
    fn sample_rate(&mut self) -> Result<u32, EngineError>;

    /// Take the renderer and start pulling audio from it.
    fn attach(&mut self, renderer: GraphRenderer) -> Result<(), EngineError>;

    /// Wake a suspended output. Called on every `start_bgm` and effect.
    fn resume(&mut self) -> Result<(), EngineError> {
        Ok(())
    }

    /// Stop pulling audio and release the renderer. A detached host answers
    /// `attach` and `resume` with [`EngineError::Disposed`].
    fn detach(&mut self) {}
}

impl<H: AudioHost + ?Sized> AudioHost for Box<H> {
    fn sample_rate(&mut self) -> Result<u32, EngineError> {
        (**self).sample_rate()
    }

    fn attach(&mut self, renderer: GraphRenderer) -> Result<(), EngineError> {
        (**self).attach(renderer)
    }

    fn resume(&mut self) -> Result<(), EngineError> {
        (**self).resume()
    }

    fn detach(&mut self) {
        (**self).detach()
    }
}
