//! The caller-owned audio engine.
//!
//! ```text
//!  AudioEngine ──(lock)──► Transport ◄──(lock)── SchedulerTask (25 ms timer)
//!      │                    ├─ Sequencer
//!      │                    └─ GraphController ──rtrb──► GraphRenderer ─► AudioHost
//!      └─ AudioHost
//! ```
//!
//! Every public call is infallible. Before `init`, after a failed `init`
//! and after `dispose`, playback calls do nothing.

pub mod host;
pub mod scheduler;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::{
    config::EngineConfig,
    dsp::NoiseBuffer,
    error::EngineError,
    graph::{audio_graph, GraphController},
    sequencing::{Event, Hit, Note, Screen, Sequencer, Theme},
    synth::{RandomSource, Voice},
    voices::{self, Effect},
};

pub use host::AudioHost;
pub use scheduler::SchedulerTask;

/// Length of the shared boot noise buffer (seconds)
const NOISE_SECONDS: f32 = 1.0;

/// State shared by the engine and the scheduler thread
pub(crate) struct Transport {
    sequencer: Sequencer,
    controller: GraphController,
    rng: Box<dyn RandomSource>,
    notes: Vec<Note>,
    schedule_ahead: f64,
    muted: bool,
    playing: bool,
}

impl Transport {
    /// One scheduler pass: hand every step due inside the look-ahead window
    /// to the renderer. Returns the number of steps scheduled.
    pub(crate) fn tick(&mut self) -> usize {
        self.controller.collect_retired();
        if !self.playing {
            return 0;
        }

        let horizon = self.controller.now() + self.schedule_ahead;
        self.notes.clear();
        let steps = self
            .sequencer
            .drain_due(horizon, self.rng.as_mut(), &mut self.notes);

        for note in self.notes.drain(..) {
            let voice = match note.event {
                Event::Pad(chord) => voices::pad(note.time, chord.tones(), self.rng.as_mut()),
                Event::Hit(Hit::Kick) => voices::kick(note.time),
                Event::Hit(Hit::Hat { open }) => voices::hat(note.time, open),
                Event::Hit(Hit::SubBass { freq }) => voices::sub_bass(note.time, freq),
            };
            tracing::trace!(
                voice = voice.label(),
                time = note.time,
                step = note.step,
                bar = note.bar,
                "dispatch"
            );
            self.controller.play(voice.bus(), Box::new(voice));
        }

        steps
    }

    fn play(&mut self, voice: Voice) -> bool {
        self.controller.play(voice.bus(), Box::new(voice))
    }
}

pub(crate) fn lock(transport: &Mutex<Transport>) -> MutexGuard<'_, Transport> {
    transport.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Snapshot of the engine for display
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineStatus {
    pub live: bool,
    pub playing: bool,
    pub muted: bool,
    pub theme: Theme,
    pub tempo: f64,
    pub step: u8,
    pub bar: u64,
    pub chord_index: usize,
    pub chord: Option<&'static str>,
    /// Audio clock time, 0 before `init`
    pub time: f64,
    /// Renderer sample rate, 0 before `init`
    pub sample_rate: f32,
    /// Voices handed to the renderer so far
    pub voices: u64,
}

struct Live {
    transport: Arc<Mutex<Transport>>,
    noise: NoiseBuffer,
    scheduler: Option<SchedulerTask>,
}

enum State {
    Uninit {
        sequencer: Sequencer,
        rng: Box<dyn RandomSource>,
    },
    Live(Live),
    /// No audio capability; stays silent for good
    Inert(Sequencer),
    Disposed(Sequencer),
}

pub struct AudioEngine<H: AudioHost> {
    host: H,
    config: EngineConfig,
    state: State,
}

impl<H: AudioHost> AudioEngine<H> {
    pub fn new(host: H, config: EngineConfig) -> Self {
        let rng = Box::new(config.rng());
        Self::with_random(host, config, rng)
    }

    /// Engine with an explicit source for pad detune and probabilistic hits.
    pub fn with_random(host: H, config: EngineConfig, rng: Box<dyn RandomSource>) -> Self {
        Self {
            host,
            config,
            state: State::Uninit {
                sequencer: Sequencer::default(),
                rng,
            },
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn is_live(&self) -> bool {
        matches!(self.state, State::Live(_))
    }

    /// Build the bus topology and attach it to the host. Only the first call
    /// does anything; returns whether the engine is live.
    pub fn init(&mut self) -> bool {
        let (sequencer, rng) = match std::mem::replace(&mut self.state, State::Disposed(Sequencer::default())) {
            State::Uninit { sequencer, rng } => (sequencer, rng),
            other => {
                let live = matches!(other, State::Live(_));
                self.state = other;
                return live;
            }
        };

        match self.build(sequencer.clone(), rng) {
            Ok(live) => {
                tracing::info!(buses = self.bus_count_of(&live), "audio engine initialised");
                self.state = State::Live(live);
                true
            }
            Err(err) => {
                tracing::warn!(error = %err, "audio unavailable, engine stays silent");
                self.state = State::Inert(sequencer);
                false
            }
        }
    }

    fn build(&mut self, sequencer: Sequencer, rng: Box<dyn RandomSource>) -> Result<Live, EngineError> {
        let sample_rate = self.host.sample_rate()? as f32;
        let (controller, renderer) = audio_graph(&self.config, sample_rate);
        self.host.attach(renderer)?;

        let noise_len = (sample_rate * NOISE_SECONDS) as usize;
        let noise = NoiseBuffer::white(noise_len, sample_rate, &mut self.config.rng());

        let transport = Transport {
            sequencer,
            controller,
            rng,
            notes: Vec::with_capacity(64),
            schedule_ahead: self.config.schedule_ahead,
            muted: false,
            playing: false,
        };

        Ok(Live {
            transport: Arc::new(Mutex::new(transport)),
            noise,
            scheduler: None,
        })
    }

    fn bus_count_of(&self, live: &Live) -> usize {
        lock(&live.transport).controller.bus_count()
    }

    /// Buses in the mix topology: 3 once live, 0 otherwise.
    pub fn bus_count(&self) -> usize {
        match &self.state {
            State::Live(live) => self.bus_count_of(live),
            _ => 0,
        }
    }

    /// Flip mute with a smooth master gain approach. Returns the new muted
    /// state, or `false` if the engine is not live.
    pub fn toggle_mute(&mut self) -> bool {
        let State::Live(live) = &self.state else {
            return false;
        };

        let mut transport = lock(&live.transport);
        let muted = !transport.muted;
        let target = if muted { 0.0 } else { self.config.master_gain };
        let now = transport.controller.now();
        if !transport
            .controller
            .ramp_master(target, now, self.config.mute_time_constant)
        {
            tracing::warn!(muted = transport.muted, "mute ramp dropped, state unchanged");
            return transport.muted;
        }
        transport.muted = muted;

        tracing::info!(muted, "mute toggled");
        muted
    }

    pub fn is_muted(&self) -> bool {
        match &self.state {
            State::Live(live) => lock(&live.transport).muted,
            _ => false,
        }
    }

    /// Switch tempo, chords and rhythm. The phrase restarts on the next step.
    pub fn set_theme(&mut self, theme: Theme) {
        tracing::info!(%theme, "theme selected");
        self.with_sequencer(|sequencer| sequencer.set_theme(theme));
    }

    /// Select the theme for a host screen id (`map`, `sector`, `ethos`, ...).
    pub fn set_screen(&mut self, screen: &str) {
        let screen = Screen::from(screen);
        tracing::debug!(screen = screen.id(), "screen changed");
        self.set_theme(screen.theme());
    }

    fn with_sequencer(&mut self, f: impl FnOnce(&mut Sequencer)) {
        match &mut self.state {
            State::Uninit { sequencer, .. } | State::Inert(sequencer) | State::Disposed(sequencer) => {
                f(sequencer)
            }
            State::Live(live) => f(&mut lock(&live.transport).sequencer),
        }
    }

    /// Start the backing track. No-op unless live and stopped.
    pub fn start_bgm(&mut self) {
        let State::Live(live) = &mut self.state else {
            return;
        };

        {
            let mut transport = lock(&live.transport);
            if transport.playing {
                return;
            }
            if let Err(err) = self.host.resume() {
                tracing::warn!(error = %err, "failed to resume audio output");
            }
            let now = transport.controller.now();
            transport.sequencer.start(now, self.config.start_delay);
            transport.playing = true;
            transport.tick();
        }

        if self.config.spawn_scheduler {
            match SchedulerTask::spawn(Arc::clone(&live.transport), self.config.lookahead_interval) {
                Ok(task) => live.scheduler = Some(task),
                Err(err) => tracing::warn!(error = %err, "scheduler unavailable, call pump() to drive it"),
            }
        }
        tracing::info!("background music started");
    }

    /// Stop scheduling new steps. Voices already handed over play out.
    pub fn stop_bgm(&mut self) {
        let State::Live(live) = &mut self.state else {
            return;
        };
        if let Some(task) = live.scheduler.take() {
            task.stop();
        }
        let mut transport = lock(&live.transport);
        if transport.playing {
            transport.playing = false;
            tracing::info!("background music stopped");
        }
    }

    pub fn is_playing(&self) -> bool {
        match &self.state {
            State::Live(live) => lock(&live.transport).playing,
            _ => false,
        }
    }

    /// Run one scheduler pass on the caller's thread. Returns the number of
    /// steps scheduled.
    pub fn pump(&mut self) -> usize {
        match &self.state {
            State::Live(live) => lock(&live.transport).tick(),
            _ => 0,
        }
    }

    /// Fire a one-shot effect at the current audio clock time.
    pub fn play_effect(&mut self, effect: Effect) {
        let State::Live(live) = &self.state else {
            return;
        };
        if let Err(err) = self.host.resume() {
            tracing::warn!(error = %err, "failed to resume audio output");
        }

        let mut transport = lock(&live.transport);
        let now = transport.controller.now();
        let voice = effect.voice(now, &live.noise);
        tracing::debug!(%effect, time = now, "effect");
        transport.play(voice);
    }

    /// Fire an effect by name. Unknown names are ignored.
    pub fn play_effect_named(&mut self, name: &str) {
        match name.parse::<Effect>() {
            Ok(effect) => self.play_effect(effect),
            Err(err) => tracing::debug!(error = %err, "ignoring effect"),
        }
    }

    pub fn status(&self) -> EngineStatus {
        let snapshot = |sequencer: &Sequencer| {
            let position = sequencer.position();
            EngineStatus {
                live: false,
                playing: false,
                muted: false,
                theme: sequencer.theme(),
                tempo: sequencer.tempo(),
                step: position.step,
                bar: position.bar,
                chord_index: position.chord_index,
                chord: sequencer.current_chord().map(|c| c.name()),
                time: 0.0,
                sample_rate: 0.0,
                voices: 0,
            }
        };

        match &self.state {
            State::Uninit { sequencer, .. } | State::Inert(sequencer) | State::Disposed(sequencer) => {
                snapshot(sequencer)
            }
            State::Live(live) => {
                let transport = lock(&live.transport);
                EngineStatus {
                    live: true,
                    playing: transport.playing,
                    muted: transport.muted,
                    time: transport.controller.now(),
                    sample_rate: transport.controller.sample_rate(),
                    voices: transport.controller.dispatched(),
                    ..snapshot(&transport.sequencer)
                }
            }
        }
    }

    /// Stop the scheduler and release the output. The engine stays silent
    /// afterwards and cannot be initialised again.
    pub fn dispose(&mut self) {
        let sequencer = match std::mem::replace(&mut self.state, State::Disposed(Sequencer::default())) {
            State::Live(mut live) => {
                if let Some(task) = live.scheduler.take() {
                    task.stop();
                }
                self.host.detach();
                tracing::info!("audio engine disposed");
                let sequencer = lock(&live.transport).sequencer.clone();
                sequencer
            }
            State::Uninit { sequencer, .. } | State::Inert(sequencer) | State::Disposed(sequencer) => {
                sequencer
            }
        };
        self.state = State::Disposed(sequencer);
    }
}

impl<H: AudioHost> Drop for AudioEngine<H> {
    fn drop(&mut self) {
        if let State::Live(live) = &mut self.state {
            if let Some(task) = live.scheduler.take() {
                task.stop();
            }
            self.host.detach();
        }
    }
}
