//! Errors raised by audio hosts.
//!
//! None of these reach the engine's callers: `AudioEngine::init` turns them
//! into the inert state and logs them.

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("no audio output device available")]
    NoOutputDevice,

    #[error("failed to fetch output config: {0}")]
    DeviceConfig(#[from] cpal::DefaultStreamConfigError),

    #[error("failed to build output stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("failed to start output stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),

    #[error("unsupported sample format: {0:?}")]
    UnsupportedSampleFormat(cpal::SampleFormat),

    #[error("failed to spawn scheduler thread: {0}")]
    SchedulerSpawn(#[source] std::io::Error),

    #[error("audio host has been disposed")]
    Disposed,
}
