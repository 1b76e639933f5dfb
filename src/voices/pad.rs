//! Chordal pad voice.
//!
//! One oscillator per chord tone, alternating triangle and sawtooth for a
//! thicker blend, each slightly detuned so the stack beats gently.
//!
//! # How It Works
//!
//! 1. Oscillators: triangle on even chord tones, sawtooth on odd ones,
//!    random detune within ±5 cents
//! 2. Low-pass sweep: 200 Hz → 1200 Hz over the first second, back to
//!    200 Hz by the end of the note
//! 3. Gain: 0.5 s swell to 0.08, 2 s release to silence
//!
//! ```text
//!  cutoff        ╱╲            gain    ╱‾‾╲
//!  1200 Hz      ╱  ╲           0.08   ╱    ╲
//!              ╱    ╲                ╱      ╲
//!  200 Hz  ───╱      ╲──              ╱        ╲
//!         T  +1.0   +2.5           T  +0.5    +2.5
//! ```
//!
//! # Variations
//!
//! - Wider detune = chorus-like shimmer
//! - Longer release = notes overlap into a continuous bed

use crate::{
    dsp::{Envelope, Waveform},
    graph::Bus,
    synth::{FilterStage, Layer, RandomSource, Voice},
};

const DETUNE_CENTS: f32 = 5.0;
const CUTOFF_CLOSED_HZ: f32 = 200.0;
const CUTOFF_OPEN_HZ: f32 = 1_200.0;
const CUTOFF_PEAK: f64 = 1.0;
const ATTACK: f64 = 0.5;
const LENGTH: f64 = 2.5;
const PEAK_GAIN: f32 = 0.08;

/// Create a pad voice for `chord` starting at `t`.
pub fn pad(t: f64, chord: &[f32], rng: &mut dyn RandomSource) -> Voice {
    let mut voice = Voice::new("pad", Bus::Bgm);

    for (i, &freq) in chord.iter().enumerate() {
        let waveform = if i % 2 == 0 {
            Waveform::Triangle
        } else {
            Waveform::Sawtooth
        };

        let cutoff = Envelope::starting_at(CUTOFF_CLOSED_HZ, t)
            .linear_to(CUTOFF_OPEN_HZ, t + CUTOFF_PEAK)
            .linear_to(CUTOFF_CLOSED_HZ, t + LENGTH);

        let gain = Envelope::starting_at(0.0, t)
            .linear_to(PEAK_GAIN, t + ATTACK)
            .linear_to(0.0, t + LENGTH);

        voice.push(
            Layer::tone(waveform, Envelope::constant(freq))
                .detune(rng.spread(DETUNE_CENTS))
                .through(FilterStage::lowpass(cutoff))
                .gain(gain)
                .span(t, t + LENGTH),
        );
    }

    voice
}
