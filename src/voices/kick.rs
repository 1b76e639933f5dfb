//! Kick drum voice.
//!
//! A sine body whose pitch dives from 100 Hz toward zero while the level
//! decays, plus a very short square click for attack definition.
//!
//! # How It Works
//!
//! 1. Sine oscillator, pitch 100 Hz → 0.01 Hz (exponential, 400 ms)
//! 2. Body gain 0.9 → 0.001 (exponential, 400 ms)
//! 3. Square click at 800 Hz, gain 0.1 → 0.001 over 50 ms
//!
//! # Variations
//!
//! - Longer body decay = boomy 808-style kick
//! - Higher click pitch = more "tick" on small speakers

use crate::{
    dsp::{Envelope, Waveform},
    graph::Bus,
    synth::{Layer, Voice},
};

const BODY_HZ: f32 = 100.0;
const BODY_FLOOR_HZ: f32 = 0.01;
const BODY_DECAY: f64 = 0.4;
const CLICK_HZ: f32 = 800.0;
const CLICK_DECAY: f64 = 0.05;

/// Create a kick drum hit at `t`.
pub fn kick(t: f64) -> Voice {
    let body = Layer::tone(
        Waveform::Sine,
        Envelope::starting_at(BODY_HZ, t).exponential_to(BODY_FLOOR_HZ, t + BODY_DECAY),
    )
    .gain(Envelope::starting_at(0.9, t).exponential_to(0.001, t + BODY_DECAY))
    .span(t, t + BODY_DECAY);

    // Click transient
    let click = Layer::tone(Waveform::Square, Envelope::constant(CLICK_HZ))
        .gain(Envelope::starting_at(0.1, t).exponential_to(0.001, t + CLICK_DECAY))
        .span(t, t + CLICK_DECAY);

    Voice::new("kick", Bus::Bgm).layer(body).layer(click)
}
