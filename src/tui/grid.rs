use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::shared::{CellState, DisplayRow, DisplayState};

const BACKGROUND: Color = Color::Black;
const EVENT_POS: Color = Color::Gray;
const VALUES: Color = Color::White;
const LOOP_MARKER: Color = Color::LightMagenta;
const CURSOR: Color = Color::Blue;
const PLAYBACK_MARKER: Color = Color::Magenta;

fn hex(value: u32, digits: usize, uppercase: bool) -> String {
    if uppercase {
        format!("{:0digits$X}", value)
    } else {
        format!("{:0digits$x}", value)
    }
}

// " xxxx: 01 02 03"
fn row_line(row: &DisplayRow, uppercase: bool) -> Line<'static> {
    let background = if row.is_cursor { CURSOR } else { BACKGROUND };
    let mut pos_style = Style::default().fg(EVENT_POS).bg(background);
    if row.is_playback {
        pos_style = pos_style.bg(PLAYBACK_MARKER);
    }

    let mut spans = vec![
        Span::raw(" "),
        Span::styled(hex(row.event_pos & 0xffff, 4, uppercase), pos_style),
        Span::styled(": ", Style::default().fg(EVENT_POS)),
    ];
    for cell in &row.cells {
        spans.push(match cell {
            CellState::Empty => Span::raw("   "),
            CellState::Value(v) => Span::styled(format!("{} ", hex(*v as u32, 2, uppercase)), Style::default().fg(VALUES)),
            CellState::Loop(v) => Span::styled(format!("{} ", hex(*v as u32, 2, uppercase)), Style::default().fg(LOOP_MARKER)),
        });
    }
    Line::from(spans).style(Style::default().bg(background))
}

pub fn draw_overview(frame: &mut Frame, area: Rect, state: &DisplayState) {
    let lines: Vec<Line> = state
        .rows
        .iter()
        .map(|row| row_line(row, state.hex_uppercase))
        .collect();
    let list = Paragraph::new(lines).style(Style::default().bg(BACKGROUND));
    frame.render_widget(list, area);
}
