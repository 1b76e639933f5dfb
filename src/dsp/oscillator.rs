#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use std::f32::consts::TAU;
use std::sync::Arc;

/*
Oscillators
===========

Naive (non-band-limited) phase-accumulator oscillators. Every voice in the
soundtrack is short and either low-passed or high-passed, so aliasing from
the sharp edges of saw and square never survives to the output.

  Sine      pure fundamental. Sub-bass body, kick, UI blips.
  Triangle  odd harmonics falling off as 1/n². Soft pad layer.
  Sawtooth  every harmonic as 1/n. Pad grit, bass grit, alarms.
  Square    odd harmonics as 1/n. Clicks and hats.

Phase lives in [0, 1). Frequency is supplied per sample so pitch sweeps
(kick drop, scan chirp) stay continuous.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Waveform {
    #[default]
    Sine,
    Triangle,
    Sawtooth,
    Square,
}

impl Waveform {
    #[inline]
    fn sample(self, phase: f32) -> f32 {
        match self {
            Waveform::Sine => (TAU * phase).sin(),
            Waveform::Triangle => 1.0 - 4.0 * (phase - 0.5).abs(),
            Waveform::Sawtooth => 2.0 * phase - 1.0,
            Waveform::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Oscillator {
    waveform: Waveform,
    phase: f32,
}

impl Oscillator {
    pub fn new(waveform: Waveform) -> Self {
        Self {
            waveform,
            phase: 0.0,
        }
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    /// Produce one sample at `frequency` Hz and advance the phase.
    #[inline]
    pub fn next_sample(&mut self, frequency: f32, sample_rate: f32) -> f32 {
        let out = self.waveform.sample(self.phase);
        let increment = (frequency / sample_rate).clamp(-0.5, 0.5);
        self.phase = (self.phase + increment).rem_euclid(1.0);
        out
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}

/// A block of white noise shared between voices.
///
/// Generated once per engine so firing the boot effect never allocates a
/// second of random samples on the control thread.
#[derive(Debug, Clone)]
pub struct NoiseBuffer {
    samples: Arc<[f32]>,
    sample_rate: f32,
}

impl NoiseBuffer {
    pub fn white(len: usize, sample_rate: f32, rng: &mut fastrand::Rng) -> Self {
        let samples: Vec<f32> = (0..len).map(|_| rng.f32() * 2.0 - 1.0).collect();
        Self {
            samples: samples.into(),
            sample_rate,
        }
    }

    /// Playback length in seconds at the buffer's own rate
    pub fn duration(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<f32> {
        self.samples.get(index).copied()
    }
}
