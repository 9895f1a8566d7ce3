// to be called on startup and quit; saves the project so we can reload it later
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::converter::{DriverLayout, ProgramImage};
use crate::pipeline::project::{ProjectState, Settings};

const CHIPSEQ_DIR: &str = ".chipseq";
const PROJECT_FILE: &str = "project.json";
const SETTINGS_FILE: &str = "settings.json";
const CONVERTED_FILE: &str = "converted.prg";
const LOG_FILE: &str = "chipseq.log";

// <project_dir>/.chipseq/<name>
fn chipseq_path(project_dir: &Path, name: &str) -> PathBuf {
    project_dir.join(CHIPSEQ_DIR).join(name)
}

pub fn log_file_path(project_dir: &Path) -> PathBuf {
    chipseq_path(project_dir, LOG_FILE)
}

pub fn ensure_project_dir(project_dir: &Path) -> anyhow::Result<()> {
    let dir = project_dir.join(CHIPSEQ_DIR);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("creating {}", dir.display()))
}

pub fn load_project(project_dir: &Path) -> Option<ProjectState> {
    let path = chipseq_path(project_dir, PROJECT_FILE);
    let data = std::fs::read_to_string(&path).ok()?;
    match serde_json::from_str(&data) {
        Ok(state) => Some(state),
        Err(e) => {
            tracing::warn!("ignoring unreadable project {}: {e}", path.display());
            None
        }
    }
}

// Save the project state to disk, making the files if they don't exist already
pub fn save_project(project_dir: &Path, state: &ProjectState) -> anyhow::Result<()> {
    ensure_project_dir(project_dir)?;
    let path = chipseq_path(project_dir, PROJECT_FILE);
    let json = serde_json::to_string_pretty(state)?;
    std::fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

pub fn load_settings(project_dir: &Path) -> Settings {
    let path = chipseq_path(project_dir, SETTINGS_FILE);
    std::fs::read_to_string(&path)
        .ok()
        .and_then(|data| serde_json::from_str(&data).ok())
        .unwrap_or_default()
}

pub fn load_driver_layout(path: &Path) -> anyhow::Result<DriverLayout> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("reading driver layout {}", path.display()))?;
    let layout = serde_json::from_str(&data)
        .with_context(|| format!("parsing driver layout {}", path.display()))?;
    Ok(layout)
}

pub fn save_converted(project_dir: &Path, image: &ProgramImage) -> anyhow::Result<PathBuf> {
    ensure_project_dir(project_dir)?;
    let path = chipseq_path(project_dir, CONVERTED_FILE);
    std::fs::write(&path, image.to_prg()).with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}
