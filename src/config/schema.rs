use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/franco/config.toml` or `~/.config/franco/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `FRANCO__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub audio: AudioSettings,
    pub ambient: AmbientSettings,
    pub catalog: CatalogSettings,
    pub storage: StorageSettings,
    pub logging: LoggingSettings,
    pub ui: UiSettings,
    pub controls: ControlsSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Initial preview volume in `[0, 1]`.
    pub preview_volume: f32,
    /// How often a playing channel reports its position (milliseconds).
    pub telemetry_interval_ms: u64,
    /// Fade-out duration of the preview when quitting (milliseconds).
    /// Set to 0 to stop immediately.
    pub quit_fade_out_ms: u64,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            preview_volume: 0.5,
            telemetry_interval_ms: 250,
            quit_fade_out_ms: 300,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AmbientSettings {
    /// Looping background track, resolved against `catalog.media_dir` when relative.
    pub source: String,
    /// Whether the ambient bed is switched on at startup.
    pub enabled_on_start: bool,
    /// Volume reached when fully faded in.
    pub ceiling: f32,
    /// Volume change per fade tick.
    pub step: f32,
    /// Interval between fade ticks (milliseconds).
    pub tick_ms: u64,
}

impl Default for AmbientSettings {
    fn default() -> Self {
        Self {
            source: "SoundHelix-Song-15.mp3".to_string(),
            enabled_on_start: false,
            ceiling: 0.3,
            step: 0.05,
            tick_ms: 100,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// Optional TOML catalog. The built-in beats are used when unset.
    pub path: Option<PathBuf>,
    /// Directory that relative preview locators are resolved against.
    pub media_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Key-value store file. Defaults to `store.json` in the data directory.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log file. Defaults to `franco.log` in the data directory.
    pub file: Option<PathBuf>,
    /// `tracing` filter directive, overridden by `RUST_LOG`.
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            file: None,
            filter: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
    /// Separator between elapsed and total time in the mini player.
    pub time_separator: String,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ franco beats ~ ".to_string(),
            time_separator: " / ".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Number of seconds to scrub when pressing `H` / `L`.
    pub scrub_seconds: u64,
    /// Preview volume change per `+` / `-` press.
    pub volume_step: f32,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self {
            scrub_seconds: 5,
            volume_step: 0.05,
        }
    }
}
