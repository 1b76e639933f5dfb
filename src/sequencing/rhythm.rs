//! Per-theme rhythm section.
//!
//! Given a step, the bar it falls in and the current chord root, decide
//! which percussion and bass hits play. Pads are not part of the rhythm;
//! the sequencer triggers them on chord changes.
//!
//! ```text
//! step        0 . 2 . 4 . 6 . 8 . 10. 12. 14.
//! ambient     K   h   h?  h   h   K?  h   h      + sub-bass on 0
//! action      K   O   K   O   K   O   K   O      + bass on every even step
//! cinematic   B (even bars only)
//! ```

use crate::synth::RandomSource;

use super::theme::Theme;

/// Chance of the syncopated second kick on step 10 (ambient)
pub const AMBIENT_SECOND_KICK: f32 = 0.7;
/// Chance of an open hat on step 4 (ambient)
pub const AMBIENT_OPEN_HAT: f32 = 0.2;

/// A single rhythmic event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Hit {
    Kick,
    Hat { open: bool },
    SubBass { freq: f32 },
}

/// Push the hits for `step` of `bar` onto `out`.
pub fn hits(
    theme: Theme,
    step: u8,
    bar: u64,
    root: f32,
    rng: &mut dyn RandomSource,
    out: &mut Vec<Hit>,
) {
    match theme {
        Theme::Cinematic => {
            if step == 0 && bar % 2 == 0 {
                out.push(Hit::SubBass { freq: root / 2.0 });
            }
        }
        Theme::Ambient => {
            if step == 0 {
                out.push(Hit::Kick);
            }
            if step == 10 && rng.chance(AMBIENT_SECOND_KICK) {
                out.push(Hit::Kick);
            }
            if step == 4 && rng.chance(AMBIENT_OPEN_HAT) {
                out.push(Hit::Hat { open: true });
            }
            if step % 2 == 0 {
                out.push(Hit::Hat { open: false });
            }
            if step == 0 {
                out.push(Hit::SubBass { freq: root / 2.0 });
            }
        }
        Theme::Action => {
            let on_kick = step % 4 == 0;
            if on_kick {
                out.push(Hit::Kick);
            }
            if step % 4 == 2 {
                out.push(Hit::Hat { open: true });
            }
            // Ducking by pitch: the bass drops an octave under each kick
            if step % 2 == 0 {
                let freq = if on_kick { root / 2.0 } else { root };
                out.push(Hit::SubBass { freq });
            }
        }
    }
}
