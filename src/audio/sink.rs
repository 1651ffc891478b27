//! Utilities for turning source locators into `rodio` sinks.
//!
//! The helpers here resolve a locator against the media root, open and decode
//! the file, and prepare a paused `Sink` at the requested start position.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use lofty::prelude::AudioFile;
use rodio::{Decoder, OutputStream, Sink, Source};

use super::types::ChannelError;

/// Resolve `locator` to a file path. Relative locators are taken from `media_root`.
pub(super) fn resolve_locator(media_root: Option<&Path>, locator: &str) -> PathBuf {
    let path = Path::new(locator);
    match media_root {
        Some(root) if path.is_relative() => root.join(path),
        _ => path.to_path_buf(),
    }
}

/// Read the natural length of `path` from its container metadata.
///
/// Zero-length reports are treated as unknown.
pub(super) fn probe_duration(path: &Path) -> Option<Duration> {
    let tagged = lofty::read_from_path(path).ok()?;
    let duration = tagged.properties().duration();
    (!duration.is_zero()).then_some(duration)
}

/// Create a paused `Sink` for `path` positioned at `start_at`.
pub(super) fn create_sink_at(
    stream: &OutputStream,
    path: &Path,
    start_at: Duration,
    looping: bool,
) -> Result<Sink, ChannelError> {
    let unavailable = |reason: String| ChannelError::SourceUnavailable {
        locator: path.display().to_string(),
        reason,
    };

    let file = File::open(path).map_err(|e| unavailable(e.to_string()))?;
    let decoder = Decoder::new(BufReader::new(file)).map_err(|e| unavailable(e.to_string()))?;

    let sink = Sink::connect_new(stream.mixer());
    if looping {
        sink.append(decoder.repeat_infinite());
    } else {
        sink.append(decoder);
    }
    sink.pause();

    // Seek inside the sink rather than skipping samples so `get_pos` stays absolute.
    if !start_at.is_zero() {
        if let Err(e) = sink.try_seek(start_at) {
            tracing::warn!(path = %path.display(), error = %e, "initial seek failed, starting from zero");
        }
    }
    Ok(sink)
}
