// The middle layer: owns the project, the order list overview and the cursor.
// The TUI sends InputEvents in and draws whatever display_state() hands back.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::converter::ConvertedSong;
use crate::core::event_to_request;
use crate::overview::{rebuild, ChannelSlot, MergeError, OrderListOverview};
use crate::pipeline::{persistence, OrderListEntry, ProjectState, Settings, Song};
use crate::shared::{CellState, DisplayRow, DisplayState, InputEvent};

const DEFAULT_VIEWPORT_HEIGHT: usize = 20;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Jump {
    pub event_pos: u32,
    pub aux: bool,
}

pub struct Middle {
    pub state: ProjectState,
    settings: Settings,
    overview: OrderListOverview,
    jumps: Rc<RefCell<VecDeque<Jump>>>, // filled by the overview's jump callback
    status_text: String,
}

impl Middle {
    // Builds the overview for `state`. A song that can't be merged is
    // reported in the status line and shown as an empty overview.
    pub fn with_state(state: ProjectState, settings: Settings) -> Self {
        let mut overview = OrderListOverview::new(DEFAULT_VIEWPORT_HEIGHT, settings.max_merged_rows);
        let jumps = Rc::new(RefCell::new(VecDeque::new()));
        let sink = jumps.clone();
        overview.set_jump_callback(Box::new(move |event_pos, aux| {
            sink.borrow_mut().push_back(Jump { event_pos, aux });
        }));

        let status_text = match overview.rebuild(&state.song) {
            Ok(_) => String::new(),
            Err(e) => e.to_string(),
        };
        overview.restore_cursor(state.cursor_position);

        Self { state, settings, overview, jumps, status_text }
    }

    pub fn overview(&self) -> &OrderListOverview {
        &self.overview
    }

    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    pub fn set_status_text(&mut self, text: impl Into<String>) {
        self.status_text = text.into();
    }

    // Returns whether the screen needs redrawing.
    pub fn handle_input(&mut self, event: InputEvent) -> bool {
        if let Some(request) = event_to_request(&event, self.settings.page_steps) {
            return self.overview.handle(request);
        }
        let handled = match event {
            InputEvent::Confirm { aux } => self.overview.select_row(aux),
            InputEvent::ClickRow { local_y, aux } => self.overview.click_row(local_y as usize, aux),
            InputEvent::Resize { viewport_height } => {
                self.overview.set_viewport_height(viewport_height as usize)
            }
            _ => false,
        };
        self.drain_jumps() || handled
    }

    // nothing plays in here, so a jump just moves the playback marker to the chosen row
    fn drain_jumps(&mut self) -> bool {
        let pending: Vec<Jump> = self.jumps.borrow_mut().drain(..).collect();
        let mut changed = false;
        for jump in pending {
            tracing::debug!(event_pos = jump.event_pos, aux = jump.aux, "jump to row");
            self.overview.tell_playback_event_position(Some(jump.event_pos));
            self.status_text = format!(
                "jump to {}{}",
                self.hex(jump.event_pos),
                if jump.aux { " (edit cursor)" } else { "" }
            );
            changed = true;
        }
        changed
    }

    pub fn tell_playback_event_position(&mut self, event_pos: Option<u32>) -> bool {
        self.overview.tell_playback_event_position(event_pos)
    }

    // Swaps in a whole new song, e.g. a freshly converted one. The current
    // song stays if the new one can't be merged.
    pub fn replace_song(&mut self, song: Song) -> Result<(), MergeError> {
        self.overview.rebuild(&song)?;
        self.state.song = song;
        self.overview.tell_playback_event_position(None);
        self.status_text.clear();
        Ok(())
    }

    // save the converted driver first; the live song only changes once it's on disk
    pub fn import_converted(&mut self, project_dir: &Path, converted: ConvertedSong) -> anyhow::Result<PathBuf> {
        rebuild(&converted.song.order_lists, &converted.song, self.settings.max_merged_rows)?;
        let written = persistence::save_converted(project_dir, &converted.image)?;
        self.replace_song(converted.song)?;
        Ok(written)
    }

    pub fn set_order_entry(&mut self, channel: usize, index: usize, entry: OrderListEntry) -> Result<bool, MergeError> {
        self.edit(|song| song.set_order_entry(channel, index, entry))
    }

    pub fn set_loop_index(&mut self, channel: usize, loop_index: usize) -> Result<bool, MergeError> {
        self.edit(|song| song.set_loop_index(channel, loop_index))
    }

    pub fn set_sequence_length(&mut self, index: u8, length: usize) -> Result<bool, MergeError> {
        self.edit(|song| song.set_sequence_length(index, length))
    }

    // edits a copy and only keeps it when the overview can still be rebuilt
    fn edit(&mut self, apply: impl FnOnce(&mut Song) -> bool) -> Result<bool, MergeError> {
        let mut song = self.state.song.clone();
        if !apply(&mut song) {
            return Ok(false);
        }
        if let Err(e) = self.overview.rebuild(&song) {
            self.status_text = e.to_string();
            return Err(e);
        }
        self.state.song = song;
        Ok(true)
    }

    pub fn sync_state(&mut self) -> &ProjectState {
        self.state.cursor_position = self.overview.cursor_position();
        &self.state
    }

    fn hex(&self, value: u32) -> String {
        if self.settings.hex_uppercase {
            format!("{:04X}", value)
        } else {
            format!("{:04x}", value)
        }
    }

    pub fn display_state(&self) -> DisplayState {
        let cursor = self.overview.cursor_position();
        let playback_row = self.overview.playback_row();
        let rows = self
            .overview
            .visible_rows()
            .map(|(i, entry)| DisplayRow {
                event_pos: entry.event_pos,
                cells: entry
                    .slots
                    .iter()
                    .map(|slot| match slot {
                        ChannelSlot::Active { sequence_index, is_loop: true } => CellState::Loop(*sequence_index),
                        ChannelSlot::Active { sequence_index, is_loop: false } => CellState::Value(*sequence_index),
                        ChannelSlot::Inactive | ChannelSlot::Terminated => CellState::Empty,
                    })
                    .collect(),
                is_cursor: i == cursor,
                is_playback: playback_row == Some(i),
            })
            .collect();

        DisplayState {
            rows,
            channel_count: self.state.song.channel_count(),
            hex_uppercase: self.settings.hex_uppercase,
            row_count: self.overview.rows().len(),
            cursor_position: cursor,
            status_text: self.status_text.clone(),
        }
    }
}
