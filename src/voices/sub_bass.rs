//! Sub-bass voice.
//!
//! A clean sine for weight plus a filtered sawtooth for grit. The saw's
//! low-pass closes quickly so the hit starts textured and settles into a
//! pure low tone.

use crate::{
    dsp::{Envelope, Waveform},
    graph::Bus,
    synth::{FilterStage, Layer, Voice},
};

const LENGTH: f64 = 0.8;

/// Create a sub-bass hit at `freq` Hz starting at `t`.
pub fn sub_bass(t: f64, freq: f32) -> Voice {
    let body = Layer::tone(Waveform::Sine, Envelope::constant(freq))
        .gain(Envelope::starting_at(0.5, t).linear_to(0.0, t + LENGTH))
        .span(t, t + LENGTH);

    let grit = Layer::tone(Waveform::Sawtooth, Envelope::constant(freq))
        .through(FilterStage::lowpass(
            Envelope::starting_at(150.0, t).linear_to(50.0, t + 0.5),
        ))
        .gain(Envelope::starting_at(0.15, t).exponential_to(0.001, t + 0.4))
        .span(t, t + LENGTH);

    Voice::new("sub_bass", Bus::Bgm).layer(body).layer(grit)
}
