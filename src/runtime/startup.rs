use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Context;
use tracing::{info, warn};

use crate::app::App;
use crate::audio::{AudioChannel, RodioChannel};
use crate::catalog::Catalog;
use crate::config::{AmbientSettings, Settings};
use crate::playback::{AmbientConfig, AmbientController, Mixer, PreviewController};
use crate::store::{LocalStore, RatingBook};

pub type RodioMixer = Mixer<RodioChannel, RodioChannel>;

/// Built-in catalog, or the TOML catalog at `path`. A bad file is fatal.
pub fn load_catalog(path: Option<&Path>) -> anyhow::Result<Catalog> {
    match path {
        Some(path) => {
            let catalog = Catalog::load(path)
                .with_context(|| format!("loading catalog {}", path.display()))?;
            info!(path = %path.display(), tracks = catalog.len(), "catalog loaded");
            Ok(catalog)
        }
        None => Ok(Catalog::builtin()),
    }
}

/// Open the rating store. Without a usable location ratings live in memory only.
pub fn open_store(settings: &Settings) -> LocalStore {
    let store = settings
        .storage_path()
        .map_or_else(LocalStore::in_memory, LocalStore::open);
    match store.path() {
        Some(path) => info!(path = %path.display(), "store opened"),
        None => warn!("no data directory, ratings will not be saved"),
    }
    store
}

pub fn ambient_config(s: &AmbientSettings) -> AmbientConfig {
    AmbientConfig {
        source: s.source.clone(),
        ceiling: s.ceiling,
        step: s.step,
        tick: Duration::from_millis(s.tick_ms),
    }
}

/// Build the storefront model and both audio channels.
pub fn build(settings: &Settings, catalog_path: Option<&Path>) -> anyhow::Result<(App, RodioMixer)> {
    let catalog = load_catalog(catalog_path)?;
    let app = App::new(catalog, RatingBook::load(open_store(settings)));

    let telemetry = Duration::from_millis(settings.audio.telemetry_interval_ms);
    let media = settings.catalog.media_dir.clone();
    let preview = RodioChannel::spawn("preview", media.clone(), telemetry)
        .context("spawning preview audio thread")?;
    let ambient = RodioChannel::spawn("ambient", media, telemetry)
        .context("spawning ambient audio thread")?;

    let mixer = Mixer::new(
        PreviewController::new(preview, settings.audio.preview_volume),
        AmbientController::new(ambient, ambient_config(&settings.ambient)),
    );
    Ok((app, mixer))
}

pub fn apply_playback_defaults<F: AudioChannel, B: AudioChannel>(
    mixer: &mut Mixer<F, B>,
    settings: &Settings,
    now: Instant,
) {
    if settings.ambient.enabled_on_start {
        mixer.set_ambient_enabled(true, now);
    }
}
