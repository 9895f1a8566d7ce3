use std::time::{Duration, Instant};

use crossterm::event::{
    self, Event, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use super::mode::TuiState;
use crate::shared::InputEvent;

// poll for input from the terminal and resolve keys and mouse events into
// input events for the middle layer
pub fn poll_input(timeout: Duration, ts: &mut TuiState) -> anyhow::Result<Vec<InputEvent>> {
    if !event::poll(timeout)? {
        return Ok(vec![]);
    }

    match event::read()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => Ok(handle_key(key.code, key.modifiers)),
        Event::Mouse(mouse) => Ok(handle_mouse(mouse, ts, Instant::now())),
        _ => Ok(vec![]),
    }
}

fn handle_key(code: KeyCode, modifiers: KeyModifiers) -> Vec<InputEvent> {
    let event = match code {
        KeyCode::Esc | KeyCode::Char('q') => InputEvent::Quit,
        // arrows only move the cursor without modifiers
        KeyCode::Up if modifiers.is_empty() => InputEvent::CursorUp,
        KeyCode::Down if modifiers.is_empty() => InputEvent::CursorDown,
        KeyCode::PageUp => InputEvent::PageUp,
        KeyCode::PageDown => InputEvent::PageDown,
        KeyCode::Home => InputEvent::Home,
        KeyCode::End => InputEvent::End,
        KeyCode::Enter => InputEvent::Confirm { aux: modifiers == KeyModifiers::CONTROL },
        _ => return vec![],
    };
    vec![event]
}

fn handle_mouse(mouse: MouseEvent, ts: &mut TuiState, now: Instant) -> Vec<InputEvent> {
    let area = ts.list_area;
    let inside = mouse.column >= area.x
        && mouse.column < area.x + area.width
        && mouse.row >= area.y
        && mouse.row < area.y + area.height;
    if !inside {
        return vec![];
    }

    match mouse.kind {
        MouseEventKind::ScrollUp => vec![InputEvent::Wheel(1)],
        MouseEventKind::ScrollDown => vec![InputEvent::Wheel(-1)],
        MouseEventKind::Down(MouseButton::Left) => {
            let local_y = mouse.row - area.y;
            let double = ts.register_click(local_y, now);
            let aux = double || mouse.modifiers.contains(KeyModifiers::CONTROL);
            vec![InputEvent::ClickRow { local_y, aux }]
        }
        _ => vec![],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::layout::Rect;

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent { kind, column, row, modifiers: KeyModifiers::NONE }
    }

    #[test]
    fn keys_map_to_navigation() {
        assert_eq!(handle_key(KeyCode::Up, KeyModifiers::NONE), vec![InputEvent::CursorUp]);
        assert!(handle_key(KeyCode::Up, KeyModifiers::SHIFT).is_empty());
        assert_eq!(
            handle_key(KeyCode::Enter, KeyModifiers::CONTROL),
            vec![InputEvent::Confirm { aux: true }]
        );
        assert_eq!(handle_key(KeyCode::Char('q'), KeyModifiers::NONE), vec![InputEvent::Quit]);
    }

    #[test]
    fn mouse_outside_the_list_is_ignored() {
        let mut ts = TuiState { list_area: Rect::new(1, 1, 30, 10), ..TuiState::default() };
        let now = Instant::now();
        assert!(handle_mouse(mouse(MouseEventKind::ScrollUp, 40, 2), &mut ts, now).is_empty());
        assert_eq!(
            handle_mouse(mouse(MouseEventKind::ScrollDown, 5, 2), &mut ts, now),
            vec![InputEvent::Wheel(-1)]
        );
    }

    #[test]
    fn clicks_are_relative_to_the_list() {
        let mut ts = TuiState { list_area: Rect::new(1, 1, 30, 10), ..TuiState::default() };
        let now = Instant::now();
        let click = mouse(MouseEventKind::Down(MouseButton::Left), 5, 4);
        assert_eq!(
            handle_mouse(click, &mut ts, now),
            vec![InputEvent::ClickRow { local_y: 3, aux: false }]
        );
        assert_eq!(
            handle_mouse(click, &mut ts, now + Duration::from_millis(50)),
            vec![InputEvent::ClickRow { local_y: 3, aux: true }]
        );
    }
}
