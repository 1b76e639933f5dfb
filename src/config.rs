//! Engine configuration.
//!
//! Defaults reproduce the mix and timing the soundtrack was tuned with; most
//! callers only touch `seed` (deterministic runs) or `spawn_scheduler`
//! (hosts that pump the scheduler from their own frame loop).

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use std::time::Duration;

/// Master bus dynamics settings.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressorConfig {
    /// Level above which gain reduction starts (dBFS)
    pub threshold_db: f32,
    /// Width of the soft knee centred on the threshold (dB)
    pub knee_db: f32,
    /// Input/output ratio above the knee
    pub ratio: f32,
    /// Seconds to apply gain reduction
    pub attack: f32,
    /// Seconds to recover from gain reduction
    pub release: f32,
}

impl Default for CompressorConfig {
    fn default() -> Self {
        Self {
            threshold_db: -12.0,
            knee_db: 30.0,
            ratio: 12.0,
            attack: 0.003,
            release: 0.25,
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// How often the scheduler task wakes up to look ahead
    pub lookahead_interval: Duration,
    /// How far past the audio clock notes get scheduled (seconds)
    pub schedule_ahead: f64,
    /// Gap between `start_bgm` and the first step (seconds)
    pub start_delay: f64,
    /// Nominal master gain (the unmuted level)
    pub master_gain: f32,
    pub bgm_gain: f32,
    pub sfx_gain: f32,
    /// Time constant of the mute/unmute gain approach (seconds)
    pub mute_time_constant: f64,
    pub compressor: CompressorConfig,
    /// Capacity of the control -> render command queue
    pub command_capacity: usize,
    /// Seed for pad detune and probabilistic hits. `None` seeds from entropy.
    pub seed: Option<u64>,
    /// Spawn a scheduler thread on `start_bgm`. When false the host drives
    /// the scheduler through `AudioEngine::pump`.
    pub spawn_scheduler: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            lookahead_interval: Duration::from_millis(25),
            schedule_ahead: 0.1,
            start_delay: 0.1,
            master_gain: 0.6,
            bgm_gain: 0.5,
            sfx_gain: 0.7,
            mute_time_constant: 0.1,
            compressor: CompressorConfig::default(),
            command_capacity: 1024,
            seed: None,
            spawn_scheduler: true,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn lookahead_interval(mut self, interval: Duration) -> Self {
        self.lookahead_interval = interval;
        self
    }

    pub fn schedule_ahead(mut self, seconds: f64) -> Self {
        self.schedule_ahead = seconds.max(0.0);
        self
    }

    pub fn master_gain(mut self, gain: f32) -> Self {
        self.master_gain = gain.max(0.0);
        self
    }

    pub fn compressor(mut self, compressor: CompressorConfig) -> Self {
        self.compressor = compressor;
        self
    }

    /// Let the host call `AudioEngine::pump` instead of spawning a thread.
    pub fn manual_scheduling(mut self) -> Self {
        self.spawn_scheduler = false;
        self
    }

    pub(crate) fn rng(&self) -> fastrand::Rng {
        match self.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        }
    }
}
