use super::load::{default_config_path, default_data_dir, resolve_config_path};
use super::schema::*;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK.get_or_init(|| Mutex::new(())).lock().unwrap()
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_franco_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("FRANCO_CONFIG_PATH", "/tmp/franco-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/franco-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("franco")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("franco")
            .join("config.toml")
    );
}

#[test]
fn data_dir_drives_default_store_and_log_paths() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_DATA_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    let data = std::path::PathBuf::from("/tmp/home-dir/.local/share/franco");
    assert_eq!(default_data_dir().unwrap(), data);

    let mut s = Settings::default();
    assert_eq!(s.storage_path().unwrap(), data.join("store.json"));
    assert_eq!(s.log_path().unwrap(), data.join("franco.log"));

    s.storage.path = Some("/tmp/elsewhere.json".into());
    assert_eq!(
        s.storage_path().unwrap(),
        std::path::PathBuf::from("/tmp/elsewhere.json")
    );
}

#[test]
fn defaults_are_valid() {
    let s = Settings::default();
    assert!(s.validate().is_ok());
    assert_eq!(s.audio.preview_volume, 0.5);
    assert_eq!(s.ambient.ceiling, 0.3);
    assert_eq!(s.ambient.step, 0.05);
    assert_eq!(s.ambient.tick_ms, 100);
    assert!(!s.ambient.enabled_on_start);
    assert!(s.catalog.path.is_none());
}

#[test]
fn validate_rejects_unusable_fade_parameters() {
    let cases: [fn(&mut Settings); 7] = [
        |s| s.ambient.ceiling = 0.0,
        |s| s.ambient.ceiling = 1.5,
        |s| s.ambient.step = 0.0,
        |s| s.ambient.step = 0.5,
        |s| s.ambient.tick_ms = 0,
        |s| s.audio.telemetry_interval_ms = 0,
        |s| s.audio.preview_volume = f32::NAN,
    ];
    for (i, mutate) in cases.iter().enumerate() {
        let mut s = Settings::default();
        mutate(&mut s);
        assert!(s.validate().is_err(), "case {i} should be rejected");
    }
}

#[test]
fn settings_load_from_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[audio]
preview_volume = 0.8
telemetry_interval_ms = 500
quit_fade_out_ms = 0

[ambient]
source = "rain.ogg"
enabled_on_start = true
ceiling = 0.4
step = 0.1
tick_ms = 50

[catalog]
path = "/srv/beats/catalog.toml"
media_dir = "/srv/beats/previews"

[logging]
filter = "franco=debug"

[controls]
scrub_seconds = 9
volume_step = 0.1

[ui]
header_text = "hello"
time_separator = " | "
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("FRANCO_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("FRANCO__AMBIENT__CEILING");

    let s = Settings::load().unwrap();
    assert_eq!(s.audio.preview_volume, 0.8);
    assert_eq!(s.audio.telemetry_interval_ms, 500);
    assert_eq!(s.audio.quit_fade_out_ms, 0);
    assert_eq!(s.ambient.source, "rain.ogg");
    assert!(s.ambient.enabled_on_start);
    assert_eq!(s.ambient.ceiling, 0.4);
    assert_eq!(s.ambient.step, 0.1);
    assert_eq!(s.ambient.tick_ms, 50);
    assert_eq!(
        s.catalog.path.as_deref(),
        Some(std::path::Path::new("/srv/beats/catalog.toml"))
    );
    assert_eq!(
        s.catalog.media_dir.as_deref(),
        Some(std::path::Path::new("/srv/beats/previews"))
    );
    assert_eq!(s.logging.filter, "franco=debug");
    assert_eq!(s.controls.scrub_seconds, 9);
    assert_eq!(s.controls.volume_step, 0.1);
    assert_eq!(s.ui.header_text, "hello");
    assert_eq!(s.ui.time_separator, " | ");
    assert!(s.validate().is_ok());
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[ambient]
tick_ms = 100
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("FRANCO_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("FRANCO__AMBIENT__TICK_MS", "40");

    let s = Settings::load().unwrap();
    assert_eq!(s.ambient.tick_ms, 40);
}

#[test]
fn missing_config_file_yields_defaults() {
    let _lock = env_lock();
    let dir = tempfile::tempdir().unwrap();
    let _g1 = EnvGuard::set(
        "FRANCO_CONFIG_PATH",
        dir.path().join("absent.toml").to_str().unwrap(),
    );

    let s = Settings::load().unwrap();
    assert_eq!(s.controls.scrub_seconds, 5);
    assert_eq!(s.ui.time_separator, " / ");
}
