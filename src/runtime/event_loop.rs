use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::{App, Overlay};
use crate::audio::AudioChannel;
use crate::config;
use crate::playback::Mixer;
use crate::ui;

/// Longest the loop sleeps waiting for input when no fade tick is due.
const IDLE_POLL: Duration = Duration::from_millis(50);

/// State tracked by the runtime event loop across iterations.
#[derive(Debug, Default)]
pub struct EventLoopState {
    /// Internal two-key prefix state used for `gg` handling.
    pub pending_gg: bool,
}

/// Main terminal event loop: pumps telemetry and fades, draws, handles input.
/// Returns `Ok(())` once the user quits and both channels are released.
pub fn run<F: AudioChannel, B: AudioChannel>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    mixer: &mut Mixer<F, B>,
    state: &mut EventLoopState,
) -> anyhow::Result<()> {
    loop {
        mixer.pump(Instant::now());

        let display = app.display_indices();
        terminal.draw(|f| {
            ui::draw(
                f,
                app,
                mixer.playback(),
                mixer.ambient(),
                &display,
                &settings.ui,
                &settings.controls,
            )
        })?;

        if event::poll(poll_timeout(mixer.next_deadline(), Instant::now()))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, app, mixer, state, Instant::now()) {
                    break;
                }
            }
        }
    }

    mixer.shutdown(Duration::from_millis(settings.audio.quit_fade_out_ms));
    Ok(())
}

/// Wake up for the next fade tick, or after `IDLE_POLL` to refresh telemetry.
pub(crate) fn poll_timeout(next_deadline: Option<Instant>, now: Instant) -> Duration {
    next_deadline.map_or(IDLE_POLL, |due| {
        due.saturating_duration_since(now).min(IDLE_POLL)
    })
}

/// Apply one key press. Returns `true` when the user asked to quit.
pub(crate) fn handle_key_event<F: AudioChannel, B: AudioChannel>(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    mixer: &mut Mixer<F, B>,
    state: &mut EventLoopState,
    now: Instant,
) -> bool {
    app.notice = None;

    if app.overlay.is_confirmation() {
        state.pending_gg = false;
        match key.code {
            KeyCode::Char('y') | KeyCode::Enter => app.confirm(),
            KeyCode::Char('n') | KeyCode::Esc => app.dismiss(),
            _ => {}
        }
        return false;
    }

    if app.filter_mode {
        state.pending_gg = false;
        match key.code {
            KeyCode::Esc => app.clear_filter(),
            KeyCode::Backspace => app.pop_filter_char(),
            KeyCode::Enter => app.exit_filter_mode(),
            KeyCode::Down => app.next(),
            KeyCode::Up => app.prev(),
            KeyCode::Char(c) if !c.is_control() => app.push_filter_char(c),
            _ => {}
        }
        return false;
    }

    if key.code != KeyCode::Char('g') {
        state.pending_gg = false;
    }

    let scrub = Duration::from_secs(settings.controls.scrub_seconds);
    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Esc => app.dismiss(),
        KeyCode::Char('/') => app.enter_filter_mode(),
        KeyCode::Char('t') => app.cycle_tag(),
        KeyCode::Char('g') => {
            if state.pending_gg {
                state.pending_gg = false;
                app.select_first();
            } else {
                state.pending_gg = true;
            }
        }
        KeyCode::Char('G') => app.select_last(),
        KeyCode::Char('j') | KeyCode::Down => app.next(),
        KeyCode::Char('k') | KeyCode::Up => app.prev(),
        KeyCode::Enter | KeyCode::Char(' ') => {
            if let Some(track) = app.selected_track() {
                mixer.play(track);
            }
        }
        KeyCode::Char('p') => {
            mixer.toggle_current();
            if let Some(id) = mixer.playback().current.clone() {
                app.select_track(&id);
            }
        }
        KeyCode::Char('L') => mixer.seek_by(scrub, true),
        KeyCode::Char('H') => mixer.seek_by(scrub, false),
        KeyCode::Char('+') | KeyCode::Char('=') => {
            mixer.set_volume(mixer.playback().volume + settings.controls.volume_step);
        }
        KeyCode::Char('-') => {
            mixer.set_volume(mixer.playback().volume - settings.controls.volume_step);
        }
        KeyCode::Char('m') => mixer.toggle_ambient(now),
        KeyCode::Char('a') => {
            if let Some(id) = app.selected_track().map(|t| t.id.clone()) {
                app.add_to_cart(&id);
            }
        }
        KeyCode::Char('x') => {
            if let Some(id) = app.selected_track().map(|t| t.id.clone()) {
                app.remove_from_cart(&id);
            }
        }
        KeyCode::Char('c') => app.toggle_cart_overlay(),
        KeyCode::Char('C') => app.request_clear_cart(),
        KeyCode::Char('b') => app.request_purchase(),
        KeyCode::Char('K') => app.toggle_details(),
        KeyCode::Char(c @ '1'..='5') => {
            if let Some(value) = c.to_digit(10) {
                app.rate_selected(value as u8);
            }
        }
        _ => {}
    }

    if app.overlay == Overlay::Details && app.selected_track().is_none() {
        app.dismiss();
    }
    false
}
