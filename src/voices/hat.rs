//! Hi-hat voice (closed and open).
//!
//! A square wave pushed through a 6 kHz high-pass: only the upper harmonics
//! survive, which reads as a metallic tick. Open and closed differ only in
//! the decay.

use crate::{
    dsp::{Envelope, Waveform},
    graph::Bus,
    synth::{FilterStage, Layer, Voice},
};

const HAT_OSC_HZ: f32 = 440.0;
const HAT_CUTOFF_HZ: f32 = 6_000.0;
const CLOSED_DECAY: f64 = 0.05;
const OPEN_DECAY: f64 = 0.3;
/// Both variants keep the oscillator running this long
const HAT_LENGTH: f64 = 0.3;

/// Create a hi-hat hit at `t`.
pub fn hat(t: f64, open: bool) -> Voice {
    let decay = if open { OPEN_DECAY } else { CLOSED_DECAY };

    let layer = Layer::tone(Waveform::Square, Envelope::constant(HAT_OSC_HZ))
        .through(FilterStage::highpass(Envelope::constant(HAT_CUTOFF_HZ)))
        .gain(Envelope::starting_at(0.05, t).exponential_to(0.001, t + decay))
        .span(t, t + HAT_LENGTH);

    Voice::new(if open { "open_hat" } else { "closed_hat" }, Bus::Bgm).layer(layer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_hat_rings_longer() {
        let closed = hat(0.0, false);
        let open = hat(0.0, true);

        let closed_gain = closed.layers()[0].gain_envelope().value_at(0.1);
        let open_gain = open.layers()[0].gain_envelope().value_at(0.1);
        assert!(open_gain > closed_gain * 10.0);
        assert_eq!(closed.label(), "closed_hat");
        assert!(closed.layers()[0].filter().is_some());
    }
}
