use crate::synth::RandomSource;

use super::{
    rhythm::{self, Hit},
    theme::{Chord, Progression, Theme},
};

/*
Look-Ahead Step Sequencer
=========================

The sequencer never looks at the wall clock. It owns the audio-clock time
of the next 16th-note step and, when asked, emits every step that falls
inside the look-ahead horizon:

  audio clock   ──────────|now─────────|now + ahead──────►
  steps          ·  ·  ·  ·  ●  ●  ●  ●|·  ·  ·
                             └ emitted ┘

Each emitted step carries its exact start time, so a late or throttled
timer only changes *when* notes are handed over, never *when* they sound.

Position
--------

  step         0..16 within the bar (one bar = one beat of the tempo)
  bar          increments when step wraps 15 → 0
  chord_index  advances on step 0 of every 4th bar

A theme change replaces the progression and resets step and chord index in
one assignment. Bar count and next note time carry over, so the groove
keeps its place on the clock.
*/

pub const STEPS_PER_BAR: u8 = 16;
/// Bars between chord changes
pub const BARS_PER_CHORD: u64 = 4;

/// Length of one 16th-note step at `tempo` BPM, in seconds
pub fn step_duration(tempo: f64) -> f64 {
    0.25 * 60.0 / tempo
}

/// Where the sequencer is in the music
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub step: u8,
    pub bar: u64,
    pub chord_index: usize,
    /// Audio-clock time of `step`
    pub next_note_time: f64,
}

/// What a scheduled note plays
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    Pad(Chord),
    Hit(Hit),
}

/// A note due at an exact audio-clock time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Note {
    pub time: f64,
    pub step: u8,
    pub bar: u64,
    pub event: Event,
}

#[derive(Debug, Clone)]
pub struct Sequencer {
    progression: Progression,
    position: Position,
    hits: Vec<Hit>,
}

impl Sequencer {
    pub fn new(progression: Progression) -> Self {
        Self::with_position(progression, Position::default())
    }

    pub fn with_position(progression: Progression, position: Position) -> Self {
        let mut sequencer = Self {
            progression,
            position,
            hits: Vec::with_capacity(8),
        };
        if sequencer.progression.chord(position.chord_index).is_none() {
            sequencer.position.chord_index = 0;
        }
        sequencer.position.step %= STEPS_PER_BAR;
        sequencer
    }

    pub fn progression(&self) -> &Progression {
        &self.progression
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn theme(&self) -> Theme {
        self.progression.theme()
    }

    pub fn tempo(&self) -> f64 {
        self.progression.tempo()
    }

    pub fn step_duration(&self) -> f64 {
        step_duration(self.progression.tempo())
    }

    /// Chord currently sounding, if the progression has any
    pub fn current_chord(&self) -> Option<&'static Chord> {
        self.progression.chord(self.position.chord_index)
    }

    /// Swap in a new progression and restart the phrase.
    pub fn set_progression(&mut self, progression: Progression) {
        *self = Self {
            progression,
            position: Position {
                step: 0,
                chord_index: 0,
                ..self.position
            },
            hits: std::mem::take(&mut self.hits),
        };
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.set_progression(theme.progression());
    }

    /// Place the next step `delay` seconds after `now`. The next note time
    /// never moves backward, so restarting right after a stop waits for the
    /// steps already handed over.
    pub fn start(&mut self, now: f64, delay: f64) {
        self.position.next_note_time = self.position.next_note_time.max(now + delay);
    }

    /// Emit every step due before `horizon`. Returns the number of steps.
    pub fn drain_due(
        &mut self,
        horizon: f64,
        rng: &mut dyn RandomSource,
        out: &mut Vec<Note>,
    ) -> usize {
        let mut steps = 0;
        while self.position.next_note_time < horizon {
            self.schedule_step(rng, out);
            steps += 1;
        }
        steps
    }

    /// Emit the current step at its scheduled time, then advance by one step.
    pub fn schedule_step(&mut self, rng: &mut dyn RandomSource, out: &mut Vec<Note>) {
        let Position {
            step,
            bar,
            next_note_time: time,
            ..
        } = self.position;
        let note = |event| Note {
            time,
            step,
            bar,
            event,
        };

        if step == 0 && bar % BARS_PER_CHORD == 0 && !self.progression.is_empty() {
            self.position.chord_index = (self.position.chord_index + 1) % self.progression.len();
            if let Some(chord) = self.current_chord() {
                out.push(note(Event::Pad(*chord)));
            }
        }

        if let Some(root) = self.current_chord().and_then(Chord::root) {
            self.hits.clear();
            rhythm::hits(self.theme(), step, bar, root, rng, &mut self.hits);
            out.extend(self.hits.iter().map(|hit| note(Event::Hit(*hit))));
        }

        self.advance();
    }

    fn advance(&mut self) {
        self.position.next_note_time += self.step_duration();
        self.position.step += 1;
        if self.position.step == STEPS_PER_BAR {
            self.position.step = 0;
            self.position.bar += 1;
        }
    }
}

impl Default for Sequencer {
    fn default() -> Self {
        Self::new(Progression::opening())
    }
}
