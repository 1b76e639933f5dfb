//! tactical - terminal front end for the procedural soundtrack
//!
//! Run with: cargo run --bin tactical
//!
//! Logs go to `tactical.log` (filter with `RUST_LOG`) so they do not tear
//! the terminal UI.

mod ui;

use std::{fs::File, sync::Mutex};

use color_eyre::eyre::WrapErr;
use tactical_audio::{io::CpalHost, AudioEngine, EngineConfig};
use tracing_subscriber::EnvFilter;

use ui::{UiApp, VIS_BUFFER_SIZE};

const LOG_FILE: &str = "tactical.log";

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let log = File::create(LOG_FILE).wrap_err("failed to create log file")?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(log))
        .with_ansi(false)
        .init();

    // A few visualisation windows of headroom before the tap starts dropping
    let (host, audio_rx) = CpalHost::with_tap(VIS_BUFFER_SIZE * 16);
    let engine = AudioEngine::new(host, EngineConfig::default());

    let mut terminal = ratatui::init();
    let result = UiApp::new(engine, audio_rx).run(&mut terminal);
    ratatui::restore();

    result
}
