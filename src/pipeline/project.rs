// defines the persisted project and the user settings that sit next to it

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use super::song::Song;

pub const DEFAULT_PAGE_STEPS: usize = 20;
pub const DEFAULT_MAX_MERGED_ROWS: usize = 0x10000;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ProjectState {
    pub song: Song,
    // where the overview cursor was when we quit, restored (clamped) on load
    #[serde(default)]
    pub cursor_position: usize,
}

// <project_dir>/.chipseq/settings.json; every field falls back to its default,
// so a partial file is fine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub page_steps: usize,
    pub max_merged_rows: usize,
    pub hex_uppercase: bool,
    pub driver: Option<PathBuf>, // driver layout json; the built-in layout is used when unset
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            page_steps: DEFAULT_PAGE_STEPS,
            max_merged_rows: DEFAULT_MAX_MERGED_ROWS,
            hex_uppercase: true,
            driver: None,
        }
    }
}
