//! Transport bar widget - theme, tempo, position, mute and levels

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::UiState;

pub fn render_transport(frame: &mut Frame, area: Rect, state: &UiState) {
    let status = &state.status;
    let block = Block::default().title(" tactical ").borders(Borders::ALL);

    let (play_symbol, play_label, play_color) = match (status.live, status.playing) {
        (false, _) => ("○", "Offline", Color::DarkGray),
        (true, true) => ("▶", "Playing", Color::Green),
        (true, false) => ("⏸", "Stopped", Color::Yellow),
    };

    let mut spans = vec![
        Span::styled(
            format!(" {} {}  ", play_symbol, play_label),
            Style::default().fg(play_color),
        ),
        Span::styled(
            format!("{} ({})  BPM: {:.0}  ", state.screen, status.theme, status.tempo),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            format!(
                "Bar {} | Step {:>2}  Chord: {}  ",
                status.bar,
                status.step,
                status.chord.unwrap_or("-")
            ),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!("t={:.2}s  voices: {}  ", status.time, status.voices),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("Peak: {:.2}  RMS: {:.2}", state.stats.peak, state.stats.rms),
            Style::default().fg(Color::Magenta),
        ),
    ];

    if status.muted {
        spans.push(Span::styled("  MUTED", Style::default().fg(Color::Red)));
    }
    if let Some(effect) = state.last_effect {
        spans.push(Span::styled(
            format!("  sfx: {effect}"),
            Style::default().fg(Color::Yellow),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}
