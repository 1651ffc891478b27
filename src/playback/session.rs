//! Session state owned by the playback controllers and read by the UI.

use std::time::Duration;

use crate::catalog::TrackId;

/// Foreground preview state. Written only by `PreviewController`.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSession {
    /// Track whose preview is loaded in the channel, if any.
    pub current: Option<TrackId>,
    pub playing: bool,
    pub elapsed: Duration,
    /// Natural length of the current preview; `None` until the channel reports it.
    pub duration: Option<Duration>,
    /// Output gain in `[0, 1]`.
    pub volume: f32,
}

impl PlaybackSession {
    pub fn new(volume: f32) -> Self {
        Self {
            current: None,
            playing: false,
            elapsed: Duration::ZERO,
            duration: None,
            volume: volume.clamp(0.0, 1.0),
        }
    }

    pub fn is_current(&self, id: &TrackId) -> bool {
        self.current.as_ref() == Some(id)
    }

    /// Fraction of the preview already played, 0 when the duration is unknown.
    pub fn progress(&self) -> f64 {
        match self.duration {
            Some(total) if !total.is_zero() => {
                (self.elapsed.as_secs_f64() / total.as_secs_f64()).clamp(0.0, 1.0)
            }
            _ => 0.0,
        }
    }
}

impl Default for PlaybackSession {
    fn default() -> Self {
        Self::new(1.0)
    }
}

/// Where the ambient bed is in its fade cycle.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum AmbientPhase {
    #[default]
    Silent,
    FadingIn,
    Audible,
    FadingOut,
}

/// Ambient bed state. Written only by `AmbientController`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AmbientSession {
    /// What the user asked for with the ambient toggle.
    pub enabled: bool,
    /// Current gain in `[0, ceiling]`.
    pub volume: f32,
    /// Whether the channel is known to be producing output.
    pub channel_playing: bool,
    pub phase: AmbientPhase,
}
