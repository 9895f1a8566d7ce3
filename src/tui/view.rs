use crate::overview::overview_width;
use crate::shared::DisplayState;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use super::grid;

// splits the screen into the bordered overview list and a one line status bar
fn sections(area: Rect, channel_count: usize) -> (Rect, Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // overview list
            Constraint::Length(1), // status line
        ])
        .split(area);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(overview_width(channel_count) as u16 + 2), // + borders
            Constraint::Min(0),
        ])
        .split(rows[0]);
    (columns[0], rows[1])
}

fn list_block(state: &DisplayState) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .title(format!(" Order lists ({} rows) ", state.row_count))
}

// Inner area of the overview list; clicks and the viewport height use this.
pub fn list_area(area: Rect, channel_count: usize) -> Rect {
    let (list, _) = sections(area, channel_count);
    Block::default().borders(Borders::ALL).inner(list)
}

pub fn render(frame: &mut Frame, area: Rect, state: &DisplayState) {
    let (list, status) = sections(area, state.channel_count);
    let block = list_block(state);
    let inner = block.inner(list);
    frame.render_widget(block, list);
    grid::draw_overview(frame, inner, state);
    draw_status(frame, status, state);
}

fn draw_status(frame: &mut Frame, area: Rect, state: &DisplayState) {
    let text = if state.status_text.is_empty() {
        format!("row {} / {}   q: quit", state.cursor_position, state.row_count)
    } else {
        state.status_text.clone()
    };
    let status = Paragraph::new(Line::from(text)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(status, area);
}
