use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::event_loop::{EventLoopState, handle_key_event, poll_timeout};
use super::settings::resolve;
use super::startup::{ambient_config, apply_playback_defaults, load_catalog};
use crate::app::{App, Overlay};
use crate::catalog::Catalog;
use crate::config::{AmbientSettings, Settings};
use crate::playback::testing::{Call, FakeChannel, StartMode};
use crate::playback::{AmbientConfig, AmbientController, AmbientPhase, Mixer, PreviewController};
use crate::store::{LocalStore, RatingBook};

struct Harness {
    settings: Settings,
    app: App,
    mixer: Mixer<FakeChannel, FakeChannel>,
    preview: FakeChannel,
    state: EventLoopState,
    now: Instant,
}

impl Harness {
    fn new() -> Self {
        let preview = FakeChannel::new(StartMode::Immediate);
        let ambient = FakeChannel::new(StartMode::Immediate);
        let mixer = Mixer::new(
            PreviewController::new(preview.clone(), 0.5),
            AmbientController::new(ambient, AmbientConfig::default()),
        );
        Self {
            settings: Settings::default(),
            app: App::new(Catalog::builtin(), RatingBook::load(LocalStore::in_memory())),
            mixer,
            preview,
            state: EventLoopState::default(),
            now: Instant::now(),
        }
    }

    fn press(&mut self, code: KeyCode) -> bool {
        let quit = handle_key_event(
            KeyEvent::new(code, KeyModifiers::NONE),
            &self.settings,
            &mut self.app,
            &mut self.mixer,
            &mut self.state,
            self.now,
        );
        self.mixer.pump(self.now);
        quit
    }

    fn chars(&mut self, s: &str) {
        for c in s.chars() {
            self.press(KeyCode::Char(c));
        }
    }
}

#[test]
fn poll_timeout_is_capped_by_the_next_fade_tick() {
    let now = Instant::now();
    assert_eq!(poll_timeout(None, now), Duration::from_millis(50));
    assert_eq!(
        poll_timeout(Some(now + Duration::from_millis(20)), now),
        Duration::from_millis(20)
    );
    assert_eq!(
        poll_timeout(Some(now + Duration::from_secs(1)), now),
        Duration::from_millis(50)
    );
    assert_eq!(poll_timeout(Some(now), now + Duration::from_millis(5)), Duration::ZERO);
}

#[test]
fn enter_previews_the_selected_beat_and_again_pauses_it() {
    let mut h = Harness::new();
    h.press(KeyCode::Char('j'));
    h.press(KeyCode::Enter);

    let second = h.app.catalog().tracks()[1].clone();
    assert_eq!(h.mixer.playback().current, Some(second.id.clone()));
    assert!(h.mixer.playback().playing);
    assert_eq!(h.preview.count(&Call::Load(second.preview.clone())), 1);

    h.press(KeyCode::Char(' '));
    assert!(!h.mixer.playback().playing);
}

#[test]
fn gg_and_g_jump_to_the_ends() {
    let mut h = Harness::new();
    let last = h.app.catalog().len() - 1;
    h.press(KeyCode::Char('G'));
    assert_eq!(h.app.selected, last);

    h.press(KeyCode::Char('g'));
    assert_eq!(h.app.selected, last);
    h.press(KeyCode::Char('g'));
    assert_eq!(h.app.selected, 0);

    h.press(KeyCode::Char('G'));
    h.press(KeyCode::Char('g'));
    h.press(KeyCode::Char('k'));
    h.press(KeyCode::Char('g'));
    assert_eq!(h.app.selected, last - 1);
}

#[test]
fn volume_keys_step_and_clamp() {
    let mut h = Harness::new();
    h.press(KeyCode::Char('+'));
    assert!((h.mixer.playback().volume - 0.55).abs() < 1e-4);
    for _ in 0..20 {
        h.press(KeyCode::Char('+'));
    }
    assert_eq!(h.mixer.playback().volume, 1.0);
    for _ in 0..30 {
        h.press(KeyCode::Char('-'));
    }
    assert_eq!(h.mixer.playback().volume, 0.0);
}

#[test]
fn search_mode_captures_typed_characters() {
    let mut h = Harness::new();
    h.press(KeyCode::Char('/'));
    assert!(h.app.filter_mode);
    h.chars("qmx");
    assert_eq!(h.app.filter_query, "qmx");
    assert!(!h.mixer.ambient().enabled, "m was typed into the query");

    h.press(KeyCode::Backspace);
    assert_eq!(h.app.filter_query, "qm");
    h.press(KeyCode::Enter);
    assert!(!h.app.filter_mode);
    assert_eq!(h.app.filter_query, "qm");

    h.press(KeyCode::Char('/'));
    h.press(KeyCode::Esc);
    assert!(h.app.filter_query.is_empty());
}

#[test]
fn cart_keys_and_purge_confirmation() {
    let mut h = Harness::new();
    h.press(KeyCode::Char('a'));
    h.press(KeyCode::Char('j'));
    h.press(KeyCode::Char('a'));
    h.press(KeyCode::Char('a'));
    assert_eq!(h.app.cart.len(), 2);

    h.press(KeyCode::Char('x'));
    assert_eq!(h.app.cart.len(), 1);

    h.press(KeyCode::Char('C'));
    assert_eq!(h.app.overlay, Overlay::ConfirmClearCart);
    // Other keys are swallowed while a dialog is open.
    assert!(!h.press(KeyCode::Char('q')));
    h.press(KeyCode::Char('n'));
    assert_eq!(h.app.cart.len(), 1);

    h.press(KeyCode::Char('C'));
    h.press(KeyCode::Char('y'));
    assert!(h.app.cart.is_empty());
}

#[test]
fn buy_shows_a_license_notice_after_confirmation() {
    let mut h = Harness::new();
    h.press(KeyCode::Char('b'));
    let first = h.app.catalog().tracks()[0].clone();
    assert_eq!(h.app.overlay, Overlay::ConfirmPurchase(first.id.clone()));

    h.press(KeyCode::Enter);
    assert_eq!(h.app.overlay, Overlay::None);
    assert!(h.app.notice.as_deref().unwrap().contains(&first.title));
    assert!(h.mixer.playback().current.is_none(), "enter confirmed, did not play");
}

#[test]
fn digit_keys_rate_the_selected_beat() {
    let mut h = Harness::new();
    h.press(KeyCode::Char('4'));
    let id = h.app.catalog().tracks()[0].id.clone();
    assert_eq!(h.app.rating(&id), 4);
    h.press(KeyCode::Char('9'));
    assert_eq!(h.app.rating(&id), 4);
}

#[test]
fn ambient_key_toggles_the_bed() {
    let mut h = Harness::new();
    h.press(KeyCode::Char('m'));
    assert!(h.mixer.ambient().enabled);
    assert_eq!(h.mixer.ambient().phase, AmbientPhase::FadingIn);
    h.press(KeyCode::Char('m'));
    assert!(!h.mixer.ambient().enabled);
    assert_eq!(h.mixer.ambient().phase, AmbientPhase::FadingOut);
}

#[test]
fn scrub_keys_seek_the_current_preview() {
    let mut h = Harness::new();
    h.press(KeyCode::Enter);
    h.press(KeyCode::Char('L'));
    h.press(KeyCode::Char('L'));
    assert_eq!(h.mixer.playback().elapsed, Duration::from_secs(10));
    h.press(KeyCode::Char('H'));
    assert_eq!(h.mixer.playback().elapsed, Duration::from_secs(5));
    assert_eq!(h.preview.calls().last(), Some(&Call::Seek(Duration::from_secs(5))));
}

#[test]
fn q_requests_quit() {
    let mut h = Harness::new();
    assert!(h.press(KeyCode::Char('q')));
}

#[test]
fn ambient_settings_map_to_controller_config() {
    let settings = AmbientSettings {
        source: "rain.ogg".into(),
        enabled_on_start: true,
        ceiling: 0.5,
        step: 0.1,
        tick_ms: 40,
    };
    let config = ambient_config(&settings);
    assert_eq!(config.source, "rain.ogg");
    assert_eq!(config.ceiling, 0.5);
    assert_eq!(config.step, 0.1);
    assert_eq!(config.tick, Duration::from_millis(40));
}

#[test]
fn enabled_on_start_switches_the_bed_on() {
    let mut h = Harness::new();
    apply_playback_defaults(&mut h.mixer, &h.settings, h.now);
    assert!(!h.mixer.ambient().enabled);

    h.settings.ambient.enabled_on_start = true;
    apply_playback_defaults(&mut h.mixer, &h.settings, h.now);
    assert!(h.mixer.ambient().enabled);
}

#[test]
fn catalog_falls_back_to_builtin_and_reports_bad_files() {
    assert_eq!(load_catalog(None).unwrap().len(), Catalog::builtin().len());

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.toml");
    std::fs::write(&path, "tracks = 3").unwrap();
    let err = load_catalog(Some(path.as_path())).unwrap_err();
    assert!(format!("{err:#}").contains("loading catalog"));
}

#[test]
fn settings_problems_are_kept_for_the_log() {
    let mut custom = Settings::default();
    custom.ambient.tick_ms = 40;
    let loaded = resolve(Ok(custom));
    assert!(loaded.fallback_reason.is_none());
    assert_eq!(loaded.settings.ambient.tick_ms, 40);

    let mut invalid = Settings::default();
    invalid.ambient.tick_ms = 0;
    let loaded = resolve(Ok(invalid));
    assert_eq!(loaded.settings.ambient.tick_ms, Settings::default().ambient.tick_ms);
    let reason = loaded.fallback_reason.unwrap();
    assert!(reason.starts_with("invalid config"));
    assert!(reason.contains("tick_ms"));

    let loaded = resolve(Err(::config::ConfigError::Message("unreadable".into())));
    assert!(loaded.fallback_reason.unwrap().contains("unreadable"));
}
