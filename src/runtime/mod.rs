use std::env;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{error, info, warn};

mod event_loop;
mod logging;
mod settings;
mod startup;

#[cfg(test)]
mod tests;

/// Entry point: `franco [CATALOG_TOML]`.
pub fn run() -> anyhow::Result<()> {
    let settings::LoadedSettings {
        settings,
        fallback_reason,
    } = settings::load_settings();

    if let Some(log_path) = settings.log_path() {
        if let Err(e) = logging::init(&log_path, &settings.logging) {
            eprintln!("franco: logging disabled: {e:#}");
        }
    }
    info!("franco starting");
    if let Some(reason) = fallback_reason {
        warn!(%reason, "settings fell back to defaults");
    }

    let catalog_path = env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| settings.catalog.path.clone());
    let (mut app, mut mixer) = startup::build(&settings, catalog_path.as_deref())?;
    startup::apply_playback_defaults(&mut mixer, &settings, Instant::now());

    enable_raw_mode().context("enabling raw mode")?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut state = event_loop::EventLoopState::default();
    let run_result = event_loop::run(&mut terminal, &settings, &mut app, &mut mixer, &mut state);
    if let Err(e) = &run_result {
        error!(error = %e, "event loop failed");
    }

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("franco stopped");
    run_result
}
