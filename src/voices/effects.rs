#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use std::{fmt, str::FromStr};

use crate::{
    dsp::{Envelope, NoiseBuffer, Waveform},
    graph::Bus,
    synth::{FilterStage, Layer, Voice},
};

/*
UI Effects
==========

One-shot sounds fired by interface events. They are not quantized to the
sequencer grid: every effect starts at the current audio clock time and is
routed to the sfx bus.

  hover      sine chirp 800 → 1200 Hz               50 ms
  click      square blip 600 Hz                      50 ms
  hack-tick  square tick 1200 Hz                     20 ms
  hack-win   saw rise 440 → 880 Hz                  300 ms
  hack-fail  saw fall 100 → 50 Hz                   300 ms
  level-up   four sine tones, 100 ms apart          600 ms
  credit     sine chirp 2000 → 3000 Hz              100 ms
  boot       white noise, low-pass closing to 50 Hz   1 s
  scan       saw sweep 400 → 1800 Hz                100 ms
  success    triangle 660 Hz stepping to 880 Hz     400 ms

Tonal effects keep their oscillator running until 400 ms after the trigger
even when the envelope is already silent.
*/

/// Oscillator stop time for single-tone effects
const EFFECT_LENGTH: f64 = 0.4;

const LEVEL_UP_TONES: [f32; 4] = [440.0, 554.0, 659.0, 880.0];
const LEVEL_UP_SPACING: f64 = 0.1;
const LEVEL_UP_TONE_LENGTH: f64 = 0.3;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Effect {
    Hover,
    Click,
    Boot,
    Success,
    Scan,
    HackTick,
    HackWin,
    HackFail,
    LevelUp,
    Credit,
}

impl Effect {
    pub const ALL: [Effect; 10] = [
        Effect::Hover,
        Effect::Click,
        Effect::Boot,
        Effect::Success,
        Effect::Scan,
        Effect::HackTick,
        Effect::HackWin,
        Effect::HackFail,
        Effect::LevelUp,
        Effect::Credit,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Effect::Hover => "hover",
            Effect::Click => "click",
            Effect::Boot => "boot",
            Effect::Success => "success",
            Effect::Scan => "scan",
            Effect::HackTick => "hack-tick",
            Effect::HackWin => "hack-win",
            Effect::HackFail => "hack-fail",
            Effect::LevelUp => "level-up",
            Effect::Credit => "credit",
        }
    }

    /// Build the effect voice starting at `t`.
    ///
    /// `noise` is only read by [`Effect::Boot`]; it plays once from its first
    /// sample.
    pub fn voice(self, t: f64, noise: &NoiseBuffer) -> Voice {
        let voice = Voice::new(self.name(), Bus::Sfx);

        match self {
            Effect::Hover => voice.layer(
                tone(Waveform::Sine, t)
                    .frequency(Envelope::starting_at(800.0, t).linear_to(1_200.0, t + 0.05))
                    .gain(Envelope::starting_at(0.05, t).linear_to(0.0, t + 0.05))
                    .build(),
            ),
            Effect::Click => voice.layer(
                tone(Waveform::Square, t)
                    .frequency(Envelope::starting_at(600.0, t))
                    .gain(Envelope::starting_at(0.05, t).exponential_to(0.001, t + 0.05))
                    .build(),
            ),
            Effect::HackTick => voice.layer(
                tone(Waveform::Square, t)
                    .frequency(Envelope::starting_at(1_200.0, t))
                    .gain(Envelope::starting_at(0.05, t).exponential_to(0.001, t + 0.02))
                    .build(),
            ),
            Effect::HackWin => voice.layer(
                tone(Waveform::Sawtooth, t)
                    .frequency(Envelope::starting_at(440.0, t).linear_to(880.0, t + 0.1))
                    .gain(Envelope::starting_at(0.2, t).linear_to(0.0, t + 0.3))
                    .build(),
            ),
            Effect::HackFail => voice.layer(
                tone(Waveform::Sawtooth, t)
                    .frequency(Envelope::starting_at(100.0, t).linear_to(50.0, t + 0.2))
                    .gain(Envelope::starting_at(0.3, t).linear_to(0.0, t + 0.3))
                    .build(),
            ),
            Effect::LevelUp => LEVEL_UP_TONES
                .iter()
                .enumerate()
                .fold(voice, |voice, (i, &freq)| {
                    let start = t + i as f64 * LEVEL_UP_SPACING;
                    let stop = start + LEVEL_UP_TONE_LENGTH;
                    voice.layer(
                        Layer::tone(Waveform::Sine, Envelope::starting_at(freq, start))
                            .gain(Envelope::starting_at(0.1, start).linear_to(0.0, stop))
                            .span(start, stop),
                    )
                }),
            Effect::Credit => voice.layer(
                tone(Waveform::Sine, t)
                    .frequency(Envelope::starting_at(2_000.0, t).linear_to(3_000.0, t + 0.1))
                    .gain(Envelope::starting_at(0.1, t).linear_to(0.0, t + 0.1))
                    .build(),
            ),
            Effect::Boot => voice.layer(
                Layer::noise(noise.clone(), t)
                    .through(FilterStage::lowpass(
                        Envelope::starting_at(1_000.0, t).exponential_to(50.0, t + 1.0),
                    ))
                    .gain(Envelope::starting_at(0.8, t).exponential_to(0.001, t + 1.5)),
            ),
            Effect::Scan => voice.layer(
                tone(Waveform::Sawtooth, t)
                    .frequency(Envelope::starting_at(400.0, t).linear_to(1_800.0, t + 0.1))
                    .gain(Envelope::starting_at(0.05, t).linear_to(0.0, t + 0.1))
                    .build(),
            ),
            Effect::Success => voice.layer(
                tone(Waveform::Triangle, t)
                    .frequency(Envelope::starting_at(660.0, t).set(880.0, t + 0.1))
                    .gain(Envelope::starting_at(0.1, t).linear_to(0.0, t + 0.4))
                    .build(),
            ),
        }
    }
}

/// Single-oscillator effect running from `t` to `t + EFFECT_LENGTH`
struct ToneEffect {
    waveform: Waveform,
    start: f64,
    frequency: Envelope,
    gain: Envelope,
}

fn tone(waveform: Waveform, start: f64) -> ToneEffect {
    ToneEffect {
        waveform,
        start,
        frequency: Envelope::constant(440.0),
        gain: Envelope::constant(1.0),
    }
}

impl ToneEffect {
    fn frequency(mut self, frequency: Envelope) -> Self {
        self.frequency = frequency;
        self
    }

    fn gain(mut self, gain: Envelope) -> Self {
        self.gain = gain;
        self
    }

    fn build(self) -> Layer {
        Layer::tone(self.waveform, self.frequency)
            .gain(self.gain)
            .span(self.start, self.start + EFFECT_LENGTH)
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Effect name not in the vocabulary
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown effect `{0}`")]
pub struct UnknownEffect(pub String);

impl FromStr for Effect {
    type Err = UnknownEffect;

    /// Accepts both `hack-tick` and `hack_tick` spellings, case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        Effect::ALL
            .into_iter()
            .find(|effect| effect.name() == normalized)
            .ok_or_else(|| UnknownEffect(s.to_string()))
    }
}
