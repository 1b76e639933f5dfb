//! Per-frame view model.

use tactical_audio::{voices::Effect, EngineStatus};

/// Level statistics of the visualisation window
#[derive(Clone, Copy, Debug, Default)]
pub struct AudioStats {
    pub peak: f32,
    pub rms: f32,
}

impl AudioStats {
    pub fn from_buffer(buffer: &[f32]) -> Self {
        if buffer.is_empty() {
            return Self::default();
        }
        let peak = buffer.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
        let rms = (buffer.iter().map(|&x| x * x).sum::<f32>() / buffer.len() as f32).sqrt();
        Self { peak, rms }
    }
}

/// Everything the widgets draw from
#[derive(Clone, Debug)]
pub struct UiState {
    pub status: EngineStatus,
    /// Screen id last sent to the engine
    pub screen: &'static str,
    pub last_effect: Option<Effect>,
    pub stats: AudioStats,
}
