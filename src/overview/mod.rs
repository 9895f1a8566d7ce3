// The order list overview: every channel's order list merged into one
// timeline, with a cursor to browse it and a callback that jumps playback or
// the editors to the chosen row.

mod merge;
mod navigation;

pub use merge::{rebuild, ChannelSlot, MergeError, OverviewEntry, SequenceLengths};
pub use navigation::{NavRequest, Navigation};

use crate::pipeline::Song;

// Receives the event position of a selected row and whether it was an
// auxiliary selection (double click, ctrl+enter).
pub type JumpCallback = Box<dyn FnMut(u32, bool)>;

// Screen width in cells for `channel_count` channels:
// `" xxxx: 01 02 03 "` plus room for a 16 character label.
pub fn overview_width(channel_count: usize) -> usize {
    6 + 3 * (channel_count + 1) + 16 + 1
}

pub struct OrderListOverview {
    rows: Vec<OverviewEntry>,
    navigation: Navigation,
    playback_event_pos: Option<u32>,
    max_rows: usize,
    on_jump: Option<JumpCallback>,
}

impl OrderListOverview {
    pub fn new(viewport_height: usize, max_rows: usize) -> Self {
        Self {
            rows: Vec::new(),
            navigation: Navigation::new(viewport_height),
            playback_event_pos: None,
            max_rows,
            on_jump: None,
        }
    }

    pub fn set_jump_callback(&mut self, on_jump: JumpCallback) {
        self.on_jump = Some(on_jump);
    }

    // Recomputes every row from `song`. On failure the previous rows and
    // cursor are kept as they were.
    pub fn rebuild(&mut self, song: &Song) -> Result<bool, MergeError> {
        let rows = match rebuild(&song.order_lists, song, self.max_rows) {
            Ok(rows) => rows,
            Err(e) => {
                tracing::warn!("order list overview not rebuilt: {e}");
                return Err(e);
            }
        };
        let changed = rows != self.rows;
        self.rows = rows;
        let resized = self.navigation.resize(self.rows.len().saturating_sub(1));
        Ok(changed || resized)
    }

    pub fn rows(&self) -> &[OverviewEntry] {
        &self.rows
    }

    pub fn navigation(&self) -> &Navigation {
        &self.navigation
    }

    pub fn cursor_position(&self) -> usize {
        self.navigation.cursor_position()
    }

    pub fn top_position(&self) -> usize {
        self.navigation.top_position()
    }

    pub fn visible_rows(&self) -> impl Iterator<Item = (usize, &OverviewEntry)> {
        self.rows
            .iter()
            .enumerate()
            .skip(self.navigation.top_position())
            .take(self.navigation.viewport_height())
    }

    pub fn handle(&mut self, request: NavRequest) -> bool {
        self.navigation.apply(request)
    }

    pub fn set_viewport_height(&mut self, viewport_height: usize) -> bool {
        self.navigation.set_viewport_height(viewport_height)
    }

    pub fn restore_cursor(&mut self, position: usize) -> bool {
        let position = position.min(self.navigation.max_cursor_position());
        self.navigation.set_cursor_position(position)
    }

    pub fn playback_event_pos(&self) -> Option<u32> {
        self.playback_event_pos
    }

    pub fn tell_playback_event_position(&mut self, event_pos: Option<u32>) -> bool {
        if self.playback_event_pos == event_pos {
            return false;
        }
        self.playback_event_pos = event_pos;
        true
    }

    // Index of the row whose span `[event_pos, next row's event_pos)` holds
    // the playback position. The last row's span is open ended.
    pub fn playback_row(&self) -> Option<usize> {
        let pos = self.playback_event_pos?;
        match self.rows.partition_point(|row| row.event_pos <= pos) {
            0 => None,
            after => Some(after - 1),
        }
    }

    pub fn select_row(&mut self, aux: bool) -> bool {
        let Some(event_pos) = self.rows.get(self.cursor_position()).map(|row| row.event_pos) else {
            return false;
        };
        match self.on_jump.as_mut() {
            Some(on_jump) => {
                on_jump(event_pos, aux);
                true
            }
            None => false,
        }
    }

    // A click on the `local_y`th visible line: moves the cursor there and
    // selects it. Clicks below the last row do nothing.
    pub fn click_row(&mut self, local_y: usize, aux: bool) -> bool {
        let row = self.navigation.top_position() + local_y;
        if local_y >= self.navigation.viewport_height() || row >= self.rows.len() {
            return false;
        }
        let moved = self.navigation.set_cursor_position(row);
        self.select_row(aux) || moved
    }
}
