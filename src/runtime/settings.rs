use crate::config;

/// Settings in effect, plus why the defaults were used instead, if they were.
pub struct LoadedSettings {
    pub settings: config::Settings,
    pub fallback_reason: Option<String>,
}

/// Load and validate settings, falling back to defaults on any problem.
///
/// Runs before the log file is open. The problem is echoed on stderr here and
/// kept in `fallback_reason` so it can be logged once logging is up.
pub fn load_settings() -> LoadedSettings {
    let loaded = resolve(config::Settings::load());
    if let Some(reason) = &loaded.fallback_reason {
        eprintln!("franco: {reason}");
    }
    loaded
}

pub(super) fn resolve(loaded: Result<config::Settings, ::config::ConfigError>) -> LoadedSettings {
    let fallback = |reason: String| LoadedSettings {
        settings: config::Settings::default(),
        fallback_reason: Some(reason),
    };
    match loaded {
        Ok(s) => match s.validate() {
            Ok(()) => LoadedSettings {
                settings: s,
                fallback_reason: None,
            },
            Err(msg) => fallback(format!("invalid config, using defaults: {msg}")),
        },
        // Config is optional; failures should not prevent the app from starting.
        Err(e) => fallback(format!("failed to load config, using defaults: {e}")),
    }
}
