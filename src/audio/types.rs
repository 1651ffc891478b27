//! Audio-related small types.
//!
//! Telemetry events, commands sent to the audio thread, channel errors and the
//! `PendingStart` handle returned by `AudioChannel::play`.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::time::Duration;

use thiserror::Error;

/// Telemetry emitted by a channel, delivered in emission order.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelEvent {
    /// Playback position advanced (or was corrected after a seek).
    TimeUpdate(Duration),
    /// The natural length of the loaded source became known (`None` = unknown).
    DurationChange(Option<Duration>),
    /// Output actually started.
    Started,
    /// Output actually paused.
    Paused,
    /// A non-looping source played to its end.
    Ended,
}

/// Why a channel could not start (or keep) playing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChannelError {
    #[error("playback start rejected: {0}")]
    StartRejected(String),
    #[error("source {locator:?} unavailable: {reason}")]
    SourceUnavailable { locator: String, reason: String },
    #[error("no audio output device: {0}")]
    OutputUnavailable(String),
    #[error("playback start interrupted")]
    Interrupted,
}

#[derive(Debug)]
pub(super) enum ChannelCmd {
    Load(String),
    Play(StartResolver),
    Pause,
    Seek(Duration),
    SetVolume(f32),
    SetLooping(bool),
    /// Stop the thread, optionally fading out over `fade_out_ms` milliseconds.
    Close { fade_out_ms: u64 },
}

/// Settles a `PendingStart`. Dropping it unresolved interrupts the start.
#[derive(Debug)]
pub struct StartResolver {
    tx: Sender<Result<(), ChannelError>>,
}

impl StartResolver {
    pub fn resolve(self, result: Result<(), ChannelError>) {
        let _ = self.tx.send(result);
    }
}

/// Asynchronous outcome of a start request.
///
/// The owner polls it from its event loop; `poll` returns `None` while the
/// start is unresolved and the outcome exactly once afterwards.
#[derive(Debug)]
pub struct PendingStart {
    rx: Receiver<Result<(), ChannelError>>,
}

impl PendingStart {
    /// Create an unresolved start and the resolver that settles it.
    pub fn new() -> (StartResolver, PendingStart) {
        let (tx, rx) = mpsc::channel();
        (StartResolver { tx }, PendingStart { rx })
    }

    /// A start that is already settled with `result`.
    pub fn settled(result: Result<(), ChannelError>) -> PendingStart {
        let (resolver, pending) = Self::new();
        resolver.resolve(result);
        pending
    }

    pub fn poll(&mut self) -> Option<Result<(), ChannelError>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(ChannelError::Interrupted)),
        }
    }
}
