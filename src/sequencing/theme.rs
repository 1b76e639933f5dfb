#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use std::{fmt, str::FromStr};

/// A fixed harmonic stack, lowest tone first
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Chord {
    name: &'static str,
    tones: &'static [f32],
}

impl Chord {
    pub const fn new(name: &'static str, tones: &'static [f32]) -> Self {
        Self { name, tones }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn tones(&self) -> &'static [f32] {
        self.tones
    }

    /// Lowest tone. `None` for an empty stack.
    pub fn root(&self) -> Option<f32> {
        self.tones.first().copied()
    }
}

pub const DM7: Chord = Chord::new("Dm7", &[146.83, 220.00, 261.63, 349.23]);
pub const DM9: Chord = Chord::new("Dm9", &[146.83, 220.00, 261.63, 349.23]);
pub const CMAJ7: Chord = Chord::new("Cmaj7", &[130.81, 196.00, 246.94, 329.63]);
pub const FMAJ7: Chord = Chord::new("Fmaj7", &[174.61, 261.63, 311.13, 392.00]);
pub const FMAJ9: Chord = Chord::new("Fmaj9", &[174.61, 220.00, 261.63, 329.63]);
pub const G6: Chord = Chord::new("G6", &[196.00, 246.94, 293.66, 392.00]);
pub const A7B9: Chord = Chord::new("A7b9", &[110.00, 164.81, 220.00, 277.18]);
pub const D_DRONE: Chord = Chord::new("D drone", &[36.71, 73.42, 146.83]);
pub const C_DRONE: Chord = Chord::new("C drone", &[32.70, 65.41, 130.81]);

static OPENING_CHORDS: [Chord; 4] = [DM7, CMAJ7, FMAJ7, A7B9];
static AMBIENT_CHORDS: [Chord; 2] = [DM9, FMAJ7];
static CINEMATIC_CHORDS: [Chord; 3] = [CMAJ7, FMAJ9, G6];
static ACTION_CHORDS: [Chord; 2] = [D_DRONE, C_DRONE];

const OPENING_TEMPO: f64 = 90.0;
/// Slowest tempo a progression accepts; keeps the step length finite
const MIN_TEMPO: f64 = 1.0;

/// Musical character selected by the active screen
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Theme {
    /// Sparse glitchy groove
    #[default]
    Ambient,
    /// Four-on-the-floor drive over bass drones
    Action,
    /// Slow pads and sub-bass only
    Cinematic,
}

impl Theme {
    pub const ALL: [Theme; 3] = [Theme::Ambient, Theme::Action, Theme::Cinematic];

    pub fn name(self) -> &'static str {
        match self {
            Theme::Ambient => "ambient",
            Theme::Action => "action",
            Theme::Cinematic => "cinematic",
        }
    }

    /// Tempo in beats per minute
    pub fn tempo(self) -> f64 {
        match self {
            Theme::Ambient => 80.0,
            Theme::Action => 120.0,
            Theme::Cinematic => 60.0,
        }
    }

    pub fn chords(self) -> &'static [Chord] {
        match self {
            Theme::Ambient => &AMBIENT_CHORDS,
            Theme::Action => &ACTION_CHORDS,
            Theme::Cinematic => &CINEMATIC_CHORDS,
        }
    }

    pub fn progression(self) -> Progression {
        Progression::new(self, self.tempo(), self.chords())
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Host screen id. Every id maps to a theme; unknown ids drive the action theme.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Screen {
    Map,
    Sector,
    Ethos,
    Other(String),
}

impl Screen {
    pub fn theme(&self) -> Theme {
        match self {
            Screen::Map => Theme::Ambient,
            Screen::Ethos => Theme::Cinematic,
            Screen::Sector | Screen::Other(_) => Theme::Action,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Screen::Map => "map",
            Screen::Sector => "sector",
            Screen::Ethos => "ethos",
            Screen::Other(id) => id,
        }
    }
}

impl From<&str> for Screen {
    fn from(id: &str) -> Self {
        match id {
            "map" => Screen::Map,
            "sector" => Screen::Sector,
            "ethos" => Screen::Ethos,
            other => Screen::Other(other.to_string()),
        }
    }
}

impl FromStr for Screen {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Screen::from(s))
    }
}

/// Tempo and chord list the sequencer plays, plus the rhythm it follows
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progression {
    theme: Theme,
    tempo: f64,
    chords: &'static [Chord],
}

impl Progression {
    pub fn new(theme: Theme, tempo: f64, chords: &'static [Chord]) -> Self {
        Self {
            theme,
            tempo: tempo.max(MIN_TEMPO),
            chords,
        }
    }

    /// What plays before any screen has selected a theme: the ambient
    /// groove at 90 BPM over a four-chord progression.
    pub fn opening() -> Self {
        Self::new(Theme::Ambient, OPENING_TEMPO, &OPENING_CHORDS)
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn tempo(&self) -> f64 {
        self.tempo
    }

    pub fn chords(&self) -> &'static [Chord] {
        self.chords
    }

    pub fn chord(&self, index: usize) -> Option<&'static Chord> {
        self.chords.get(index)
    }

    pub fn len(&self) -> usize {
        self.chords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chords.is_empty()
    }
}

impl Default for Progression {
    fn default() -> Self {
        Self::opening()
    }
}
