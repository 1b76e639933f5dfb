//! TUI for tactical
//!
//! Drives the engine from key presses and visualises its output. The first
//! key press initialises audio, the terminal equivalent of the user gesture
//! a browser needs before it will make sound.

mod spectrum;
mod state;
mod steps;
mod transport;
mod waveform;

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use rtrb::Consumer;
use std::time::Duration;
use tactical_audio::{io::CpalHost, voices::Effect, AudioEngine};

pub use state::{AudioStats, UiState};

use spectrum::{render_spectrum, SpectrumAnalyzer};
use steps::render_steps;
use transport::render_transport;
use waveform::render_waveform;

/// Audio visualization buffer size
pub const VIS_BUFFER_SIZE: usize = 1024;

/// Spectrum sample rate until the device reports its own
const DEFAULT_SAMPLE_RATE: f32 = 48_000.0;

const SCREENS: [&str; 3] = ["map", "sector", "ethos"];

const HELP: &str = " [1/2/3] map/sector/ethos  [S] start/stop  [M] mute  \
[H]over [C]lick [B]oot [U]success sca[N] [T]ick [W]in [F]ail [L]evel-up c[R]edit  [Q] quit";

fn effect_for_key(c: char) -> Option<Effect> {
    let effect = match c.to_ascii_lowercase() {
        'h' => Effect::Hover,
        'c' => Effect::Click,
        'b' => Effect::Boot,
        'u' => Effect::Success,
        'n' => Effect::Scan,
        't' => Effect::HackTick,
        'w' => Effect::HackWin,
        'f' => Effect::HackFail,
        'l' => Effect::LevelUp,
        'r' => Effect::Credit,
        _ => return None,
    };
    Some(effect)
}

pub struct UiApp {
    engine: AudioEngine<CpalHost>,
    /// Ring buffer receiver for output samples
    audio_rx: Consumer<f32>,
    audio_buffer: Vec<f32>,
    spectrum: SpectrumAnalyzer,
    screen: &'static str,
    last_effect: Option<Effect>,
    should_quit: bool,
}

impl UiApp {
    pub fn new(engine: AudioEngine<CpalHost>, audio_rx: Consumer<f32>) -> Self {
        Self {
            engine,
            audio_rx,
            audio_buffer: vec![0.0; VIS_BUFFER_SIZE],
            spectrum: SpectrumAnalyzer::new(VIS_BUFFER_SIZE, DEFAULT_SAMPLE_RATE),
            screen: SCREENS[0],
            last_effect: None,
            should_quit: false,
        }
    }

    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_audio();

            let state = UiState {
                status: self.engine.status(),
                screen: self.screen,
                last_effect: self.last_effect,
                stats: AudioStats::from_buffer(&self.audio_buffer),
            };
            if state.status.sample_rate > 0.0 && state.status.sample_rate != self.spectrum.sample_rate() {
                self.spectrum = SpectrumAnalyzer::new(VIS_BUFFER_SIZE, state.status.sample_rate);
            }
            self.spectrum.update(&self.audio_buffer);

            terminal.draw(|frame| self.render(frame, &state))?;

            // Non-blocking, ~60fps
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }

        self.engine.dispose();
        Ok(())
    }

    /// Keep the last VIS_BUFFER_SIZE samples from the output tap
    fn poll_audio(&mut self) {
        while let Ok(sample) = self.audio_rx.pop() {
            self.audio_buffer.push(sample);
        }
        if self.audio_buffer.len() > VIS_BUFFER_SIZE {
            let excess = self.audio_buffer.len() - VIS_BUFFER_SIZE;
            self.audio_buffer.drain(..excess);
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        if let KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc = key {
            self.should_quit = true;
            return;
        }

        // Any other key counts as the unlocking gesture
        self.engine.init();

        match key {
            KeyCode::Char(c @ '1'..='3') => {
                let index = usize::from(c as u8 - b'1');
                self.screen = SCREENS[index];
                self.engine.set_screen(self.screen);
            }
            KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Char(' ') => {
                if self.engine.is_playing() {
                    self.engine.stop_bgm();
                } else {
                    self.engine.start_bgm();
                }
            }
            KeyCode::Char('m') | KeyCode::Char('M') => {
                self.engine.toggle_mute();
            }
            KeyCode::Char(c) => {
                if let Some(effect) = effect_for_key(c) {
                    self.engine.play_effect(effect);
                    self.last_effect = Some(effect);
                }
            }
            _ => {}
        }
    }

    fn render(&self, frame: &mut Frame, state: &UiState) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Transport bar
                Constraint::Length(6), // Step grid
                Constraint::Min(6),    // Waveform + spectrum
                Constraint::Length(1), // Help bar
            ])
            .split(frame.area());

        render_transport(frame, chunks[0], state);
        render_steps(frame, chunks[1], &state.status);

        let scopes = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[2]);
        render_waveform(frame, scopes[0], &self.audio_buffer, state.status.muted);
        render_spectrum(frame, scopes[1], self.spectrum.data());

        let help = Paragraph::new(HELP).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[3]);
    }
}
