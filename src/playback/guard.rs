use tracing::debug;

use crate::audio::{AudioChannel, ChannelError, PendingStart};

/// Outcome of a start that just settled.
#[derive(Debug, Clone, PartialEq)]
pub struct Settlement {
    pub result: Result<(), ChannelError>,
    /// A pause was requested while the start was pending and has now been issued.
    pub paused: bool,
}

/// Serializes `pause` behind an unresolved `play`.
///
/// A pause requested while a start is pending is remembered and issued only
/// once the start settles, whatever its outcome.
#[derive(Debug, Default)]
pub struct StartGuard {
    pending: Option<PendingStart>,
    pause_after_settle: bool,
}

impl StartGuard {
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pause_deferred(&self) -> bool {
        self.pause_after_settle
    }

    /// Track a new start. Any previous start and deferred pause are superseded.
    pub fn begin(&mut self, pending: PendingStart) {
        self.pending = Some(pending);
        self.pause_after_settle = false;
    }

    /// Pause `channel` now, or once the pending start settles.
    ///
    /// Returns `true` when the pause was issued immediately.
    pub fn request_pause<C: AudioChannel>(&mut self, channel: &mut C) -> bool {
        if self.pending.is_some() {
            debug!("pause deferred until the pending start settles");
            self.pause_after_settle = true;
            false
        } else {
            channel.pause();
            true
        }
    }

    /// Drop a deferred pause, e.g. because playback is wanted again.
    pub fn withdraw_pause(&mut self) {
        self.pause_after_settle = false;
    }

    /// Check the pending start; issue the deferred pause if it settled.
    pub fn poll<C: AudioChannel>(&mut self, channel: &mut C) -> Option<Settlement> {
        let result = self.pending.as_mut()?.poll()?;
        self.pending = None;

        let paused = std::mem::take(&mut self.pause_after_settle) && result.is_ok();
        if paused {
            channel.pause();
        }
        Some(Settlement { result, paused })
    }

    /// Forget the pending start without waiting for it.
    pub fn abandon(&mut self) {
        self.pending = None;
        self.pause_after_settle = false;
    }
}
