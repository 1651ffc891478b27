use std::{env, path::PathBuf};

use super::schema::Settings;

/// Configuration loading helpers.
///
/// `Settings::load` tries environment variables first (prefix `FRANCO__`), then an
/// optional config file and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("FRANCO")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        let ambient = &self.ambient;
        if !(ambient.ceiling > 0.0 && ambient.ceiling <= 1.0) {
            return Err("ambient.ceiling must be in (0, 1]".to_string());
        }
        if !(ambient.step > 0.0) {
            return Err("ambient.step must be > 0".to_string());
        }
        if ambient.step > ambient.ceiling {
            return Err("ambient.step must not exceed ambient.ceiling".to_string());
        }
        if ambient.tick_ms == 0 {
            return Err("ambient.tick_ms must be >= 1".to_string());
        }
        if self.audio.telemetry_interval_ms == 0 {
            return Err("audio.telemetry_interval_ms must be >= 1".to_string());
        }
        if !(0.0..=1.0).contains(&self.audio.preview_volume) {
            return Err("audio.preview_volume must be in [0, 1]".to_string());
        }
        if !(0.0..=1.0).contains(&self.controls.volume_step) {
            return Err("controls.volume_step must be in [0, 1]".to_string());
        }
        Ok(())
    }

    /// Store file, falling back to `store.json` in the data directory.
    pub fn storage_path(&self) -> Option<PathBuf> {
        self.storage
            .path
            .clone()
            .or_else(|| default_data_dir().map(|d| d.join("store.json")))
    }

    /// Log file, falling back to `franco.log` in the data directory.
    pub fn log_path(&self) -> Option<PathBuf> {
        self.logging
            .file
            .clone()
            .or_else(|| default_data_dir().map(|d| d.join("franco.log")))
    }
}

/// Resolve the config path from `FRANCO_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("FRANCO_CONFIG_PATH") {
        let p = PathBuf::from(p);
        return Some(p);
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/franco/config.toml`
/// or `~/.config/franco/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    xdg_dir("XDG_CONFIG_HOME", ".config").map(|d| d.join("franco").join("config.toml"))
}

/// `$XDG_DATA_HOME/franco` or `~/.local/share/franco`.
pub fn default_data_dir() -> Option<PathBuf> {
    xdg_dir("XDG_DATA_HOME", ".local/share").map(|d| d.join("franco"))
}

fn xdg_dir(var: &str, home_fallback: &str) -> Option<PathBuf> {
    if let Some(xdg) = env::var_os(var) {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(home_fallback))
    }
}
