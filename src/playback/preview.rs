use std::time::Duration;

use tracing::{debug, warn};

use crate::audio::{AudioChannel, ChannelEvent};
use crate::catalog::Track;

use super::guard::StartGuard;
use super::session::PlaybackSession;

/// Drives the single preview channel shared by every catalog item.
pub struct PreviewController<C: AudioChannel> {
    channel: C,
    session: PlaybackSession,
    guard: StartGuard,
}

impl<C: AudioChannel> PreviewController<C> {
    pub fn new(mut channel: C, volume: f32) -> Self {
        let session = PlaybackSession::new(volume);
        channel.set_looping(false);
        channel.set_volume(session.volume);
        Self {
            channel,
            session,
            guard: StartGuard::default(),
        }
    }

    pub fn session(&self) -> &PlaybackSession {
        &self.session
    }

    /// The signal the ambient bed yields to.
    pub fn is_playing(&self) -> bool {
        self.session.playing
    }

    /// Play `track`, or toggle it when it is already the current track.
    ///
    /// Toggling never reloads the source, so resuming continues where it paused.
    pub fn select_and_play(&mut self, track: &Track) {
        if self.session.is_current(&track.id) {
            self.toggle();
            return;
        }

        debug!(track = %track.id, preview = %track.preview, "switching preview");
        self.channel.load(&track.preview);
        self.session.current = Some(track.id.clone());
        self.session.playing = false;
        self.session.elapsed = Duration::ZERO;
        self.session.duration = None;
        self.start();
    }

    /// Toggle play/pause of the current track. No-op when nothing is loaded.
    pub fn toggle(&mut self) {
        if self.session.current.is_none() {
            return;
        }

        if self.guard.is_pending() {
            // The start has not settled yet; flip the deferred pause instead of racing it.
            if self.guard.pause_deferred() {
                self.guard.withdraw_pause();
            } else {
                self.guard.request_pause(&mut self.channel);
            }
        } else if self.session.playing {
            self.guard.request_pause(&mut self.channel);
        } else {
            self.start();
        }
    }

    /// Move the playhead of the current track.
    ///
    /// The session reflects the request right away; the channel's next time
    /// update carries the position it actually settled on.
    pub fn seek(&mut self, position: Duration) {
        if self.session.current.is_none() {
            return;
        }
        let position = match self.session.duration {
            Some(total) => position.min(total),
            None => position,
        };
        self.channel.seek(position);
        self.session.elapsed = position;
    }

    /// Seek relative to the current position, never before zero.
    pub fn seek_by(&mut self, delta: Duration, forward: bool) {
        let target = if forward {
            self.session.elapsed.saturating_add(delta)
        } else {
            self.session.elapsed.saturating_sub(delta)
        };
        self.seek(target);
    }

    /// Set the preview gain, clamped to `[0, 1]`. Non-finite input is ignored.
    pub fn set_volume(&mut self, level: f32) {
        if !level.is_finite() {
            return;
        }
        let level = level.clamp(0.0, 1.0);
        self.channel.set_volume(level);
        self.session.volume = level;
    }

    /// Settle any pending start, then apply pending telemetry in emission order.
    ///
    /// A start can settle before its `Started` event is drained, so a
    /// successful settle marks the session playing on its own.
    pub fn pump(&mut self) {
        if let Some(settled) = self.guard.poll(&mut self.channel) {
            match settled.result {
                Ok(()) => self.session.playing = !settled.paused,
                Err(e) => {
                    warn!(track = ?self.session.current, error = %e, "preview start rejected");
                    self.session.playing = false;
                }
            }
        }

        while let Some(event) = self.channel.next_event() {
            self.apply(event);
        }
    }

    fn apply(&mut self, event: ChannelEvent) {
        match event {
            ChannelEvent::TimeUpdate(t) => self.session.elapsed = t,
            ChannelEvent::DurationChange(d) => {
                self.session.duration = d.filter(|d| !d.is_zero());
            }
            ChannelEvent::Started => self.session.playing = true,
            ChannelEvent::Paused => self.session.playing = false,
            ChannelEvent::Ended => {
                self.session.playing = false;
                self.session.elapsed = Duration::ZERO;
            }
        }
    }

    fn start(&mut self) {
        let pending = self.channel.play();
        self.guard.begin(pending);
    }

    /// Release the channel, fading out over `fade_out`.
    pub fn shutdown(&mut self, fade_out: Duration) {
        self.guard.abandon();
        self.channel.close(fade_out);
        self.session.playing = false;
    }
}
