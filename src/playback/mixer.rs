use std::time::{Duration, Instant};

use crate::audio::AudioChannel;
use crate::catalog::Track;

use super::ambient::AmbientController;
use super::preview::PreviewController;
use super::session::{AmbientSession, PlaybackSession};

/// Owns both controllers and routes the preview's "is playing" signal into
/// the ambient bed.
///
/// This is the only place that writes the ambient controller's foreground
/// input, so each session keeps a single writer.
pub struct Mixer<F: AudioChannel, B: AudioChannel> {
    preview: PreviewController<F>,
    ambient: AmbientController<B>,
}

impl<F: AudioChannel, B: AudioChannel> Mixer<F, B> {
    pub fn new(preview: PreviewController<F>, ambient: AmbientController<B>) -> Self {
        Self { preview, ambient }
    }

    pub fn playback(&self) -> &PlaybackSession {
        self.preview.session()
    }

    pub fn ambient(&self) -> &AmbientSession {
        self.ambient.session()
    }

    pub fn play(&mut self, track: &Track) {
        self.preview.select_and_play(track);
    }

    /// Toggle the current preview (the mini player's button).
    pub fn toggle_current(&mut self) {
        self.preview.toggle();
    }

    pub fn seek(&mut self, position: Duration) {
        self.preview.seek(position);
    }

    pub fn seek_by(&mut self, delta: Duration, forward: bool) {
        self.preview.seek_by(delta, forward);
    }

    pub fn set_volume(&mut self, level: f32) {
        self.preview.set_volume(level);
    }

    pub fn toggle_ambient(&mut self, now: Instant) {
        self.ambient.toggle(now);
    }

    pub fn set_ambient_enabled(&mut self, enabled: bool, now: Instant) {
        self.ambient.set_enabled(enabled, now);
    }

    /// Apply preview telemetry, republish the playing signal and advance fades.
    pub fn pump(&mut self, now: Instant) {
        self.preview.pump();
        self.ambient
            .set_foreground_playing(self.preview.is_playing(), now);
        self.ambient.advance(now);
    }

    /// Deadline of the next fade tick, for sizing the event loop's poll timeout.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.ambient.next_tick_due()
    }

    /// Cancel outstanding fades and release both channels.
    pub fn shutdown(&mut self, preview_fade_out: Duration) {
        self.ambient.shutdown();
        self.preview.shutdown(preview_fade_out);
    }
}
