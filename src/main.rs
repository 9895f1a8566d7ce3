use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;
use tracing_subscriber::EnvFilter;

use chipseq::converter::{self, DriverLayout, ProgramImage};
use chipseq::middle::Middle;
use chipseq::pipeline::persistence;
use chipseq::shared::InputEvent;
use chipseq::tui;

#[derive(Parser, Debug)]
#[command(name = "chipseq", about = "Order list overview for chip tune songs")]
struct Args {
    /// Project directory; defaults to the current directory
    project_dir: Option<PathBuf>,

    /// Convert a legacy 20.G4 song (.prg) into the project
    #[arg(long, value_name = "FILE")]
    import: Option<PathBuf>,

    /// Driver layout description (JSON) to convert against
    #[arg(long, value_name = "FILE")]
    driver: Option<PathBuf>,

    /// Driver program (.prg) the converted tables are written over
    #[arg(long, value_name = "FILE")]
    driver_image: Option<PathBuf>,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

// logs go to a file; the terminal belongs to the ui
fn init_logging(project_dir: &Path) {
    if persistence::ensure_project_dir(project_dir).is_err() {
        return;
    }
    let Ok(file) = std::fs::File::create(persistence::log_file_path(project_dir)) else {
        return;
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
}

fn import_legacy(
    middle: &mut Middle,
    project_dir: &Path,
    path: &Path,
    driver: Option<&Path>,
    driver_image: Option<&Path>,
) -> anyhow::Result<String> {
    let prg = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let layout = match driver {
        Some(p) => persistence::load_driver_layout(p)?,
        None => DriverLayout::default(),
    };
    let image = match driver_image {
        Some(p) => {
            let bytes = std::fs::read(p).with_context(|| format!("reading {}", p.display()))?;
            Some(ProgramImage::from_prg(&bytes).with_context(|| format!("{} has no load address", p.display()))?)
        }
        None => None,
    };

    let Some(converted) = converter::convert(&prg, &layout, image.as_ref())? else {
        tracing::warn!("{} is not a 20.G4 song", path.display());
        return Ok(format!("{} is not a 20.G4 song, nothing imported", path.display()));
    };
    let written = middle.import_converted(project_dir, converted)?;
    Ok(format!("imported {}, driver written to {}", path.display(), written.display()))
}

fn run() -> anyhow::Result<()> {
    let args = Args::parse();
    let project_dir = args
        .project_dir
        .clone()
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_default());
    init_logging(&project_dir);
    tracing::info!("opening project {}", project_dir.display());

    let settings = persistence::load_settings(&project_dir);
    let state = persistence::load_project(&project_dir).unwrap_or_default();
    let mut middle = Middle::with_state(state, settings.clone());

    if let Some(path) = &args.import {
        let driver = args.driver.as_deref().or(settings.driver.as_deref());
        match import_legacy(&mut middle, &project_dir, path, driver, args.driver_image.as_deref()) {
            Ok(message) => middle.set_status_text(message),
            Err(e) => {
                tracing::warn!("import of {} failed: {e:#}", path.display());
                middle.set_status_text(format!("import failed: {e:#}"));
            }
        }
    }

    terminal::enable_raw_mode()?;
    let _ = crossterm::execute!(std::io::stdout(), EnableMouseCapture);
    let _guard = RawModeGuard; // auto drops when out of scope

    let backend = CrosstermBackend::new(std::io::stdout());
    let mut term = Terminal::new(backend)?;
    term.clear()?;

    let tick_rate = Duration::from_millis(16); // ~60fps
    let mut tui_state = tui::mode::TuiState::default();
    let mut dirty = true;
    let mut last_area = Rect::default();

    loop {
        let size = term.size()?;
        let area = Rect::new(0, 0, size.width, size.height);
        if area != last_area {
            last_area = area;
            dirty = true;
        }
        tui_state.list_area = tui::view::list_area(area, middle.state.song.channel_count());
        if tui_state.list_area.height != tui_state.viewport_height {
            tui_state.viewport_height = tui_state.list_area.height;
            middle.handle_input(InputEvent::Resize { viewport_height: tui_state.viewport_height });
        }

        if dirty {
            let ds = middle.display_state();
            term.draw(|frame| {
                tui::view::render(frame, frame.area(), &ds);
            })?;
            dirty = false;
        }

        let events = tui::input::poll_input(tick_rate, &mut tui_state)?;
        for event in events {
            if event == InputEvent::Quit {
                // save before quitting
                persistence::save_project(&project_dir, middle.sync_state())?;
                tracing::info!("project saved");
                return Ok(());
            }
            dirty |= middle.handle_input(event);
        }
    }
}

struct RawModeGuard;
impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = crossterm::execute!(std::io::stdout(), DisableMouseCapture);
        let _ = terminal::disable_raw_mode();
    }
}
