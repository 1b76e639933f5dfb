//! 16-step grid widget
//!
//! One row per instrument showing what the current theme plays on each
//! step, with the playhead column highlighted. Probabilistic hits are drawn
//! dimmed.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tactical_audio::{
    sequencing::{rhythm, Hit, STEPS_PER_BAR},
    synth::Fixed,
    EngineStatus,
};

#[derive(Clone, Copy, PartialEq)]
enum Cell {
    Rest,
    Maybe,
    Hit,
}

struct Row {
    label: &'static str,
    matches: fn(&Hit) -> bool,
}

const ROWS: [Row; 4] = [
    Row {
        label: "kick ",
        matches: |hit| matches!(hit, Hit::Kick),
    },
    Row {
        label: "hat  ",
        matches: |hit| matches!(hit, Hit::Hat { open: false }),
    },
    Row {
        label: "open ",
        matches: |hit| matches!(hit, Hit::Hat { open: true }),
    },
    Row {
        label: "bass ",
        matches: |hit| matches!(hit, Hit::SubBass { .. }),
    },
];

/// Grid cells for one row: a hit that only shows up when every chance
/// fires is a `Maybe`.
fn row_cells(status: &EngineStatus, row: &Row) -> Vec<Cell> {
    (0..STEPS_PER_BAR)
        .map(|step| {
            let count = |unit: f32| {
                let mut hits = Vec::new();
                rhythm::hits(status.theme, step, status.bar, 100.0, &mut Fixed(unit), &mut hits);
                hits.iter().filter(|hit| (row.matches)(hit)).count()
            };
            let certain = count(0.999);
            let possible = count(0.0);
            if certain > 0 {
                Cell::Hit
            } else if possible > 0 {
                Cell::Maybe
            } else {
                Cell::Rest
            }
        })
        .collect()
}

pub fn render_steps(frame: &mut Frame, area: Rect, status: &EngineStatus) {
    let block = Block::default().title(" Steps ").borders(Borders::ALL);

    let lines: Vec<Line> = ROWS
        .iter()
        .map(|row| {
            let mut spans = vec![Span::styled(row.label, Style::default().fg(Color::DarkGray))];
            for (step, cell) in row_cells(status, row).into_iter().enumerate() {
                let playhead = status.playing && step == usize::from(status.step);
                let (glyph, color) = match cell {
                    Cell::Hit => ("■ ", Color::Cyan),
                    Cell::Maybe => ("□ ", Color::Blue),
                    Cell::Rest => ("· ", Color::DarkGray),
                };
                let mut style = Style::default().fg(color);
                if playhead {
                    style = style.bg(Color::DarkGray).add_modifier(Modifier::BOLD);
                }
                spans.push(Span::styled(glyph, style));
            }
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
