use std::time::{Duration, Instant};

use ratatui::layout::Rect;

// two clicks on the same row within this count as a double click
pub const DOUBLE_CLICK: Duration = Duration::from_millis(400);

// state local to the tui: where the overview list sits on screen (synced from
// the layout each frame) and the last click, for double click detection
#[derive(Clone, Debug, Default)]
pub struct TuiState {
    pub list_area: Rect,
    pub viewport_height: u16,
    pub last_click: Option<(Instant, u16)>,
}

impl TuiState {
    // Records a click on `local_y`; true when it completes a double click.
    pub fn register_click(&mut self, local_y: u16, now: Instant) -> bool {
        let double = matches!(
            self.last_click,
            Some((at, row)) if row == local_y && now.duration_since(at) <= DOUBLE_CLICK
        );
        self.last_click = if double { None } else { Some((now, local_y)) };
        double
    }
}
