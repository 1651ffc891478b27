use std::time::{Duration, Instant};

use tracing::{debug, trace, warn};

use crate::audio::AudioChannel;

use super::fade::{FadeDirection, FadeTimer, step_level};
use super::guard::StartGuard;
use super::session::{AmbientPhase, AmbientSession};

/// Ambient bed parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct AmbientConfig {
    /// Locator of the looping background track.
    pub source: String,
    /// Gain reached when fully audible, within `[0, 1]`.
    pub ceiling: f32,
    /// Gain change per fade tick.
    pub step: f32,
    /// Interval between fade ticks.
    pub tick: Duration,
}

impl Default for AmbientConfig {
    fn default() -> Self {
        Self {
            source: "SoundHelix-Song-15.mp3".to_string(),
            ceiling: 0.3,
            step: 0.05,
            tick: Duration::from_millis(100),
        }
    }
}

/// Keeps a looping background bed audible only while the user wants it and no
/// preview is playing, fading between silence and the ceiling.
///
/// `advance` must be called from the event loop at least as often as
/// `next_tick_due` asks for; all other methods only change targets.
pub struct AmbientController<C: AudioChannel> {
    channel: C,
    config: AmbientConfig,
    session: AmbientSession,
    foreground_playing: bool,
    fade: Option<FadeTimer>,
    guard: StartGuard,
}

impl<C: AudioChannel> AmbientController<C> {
    pub fn new(mut channel: C, mut config: AmbientConfig) -> Self {
        config.ceiling = config.ceiling.clamp(0.0, 1.0);
        config.step = config.step.abs().max(f32::EPSILON);

        channel.set_looping(true);
        channel.load(&config.source);
        channel.set_volume(0.0);

        Self {
            channel,
            config,
            session: AmbientSession::default(),
            foreground_playing: false,
            fade: None,
            guard: StartGuard::default(),
        }
    }

    pub fn session(&self) -> &AmbientSession {
        &self.session
    }

    /// When the in-flight fade wants its next tick, if any.
    pub fn next_tick_due(&self) -> Option<Instant> {
        self.fade.map(|f| f.next_due())
    }

    /// Whether the bed should currently be audible.
    pub fn target_active(&self) -> bool {
        self.session.enabled && !self.foreground_playing
    }

    pub fn set_enabled(&mut self, enabled: bool, now: Instant) {
        self.session.enabled = enabled;
        self.reconcile(now);
    }

    pub fn toggle(&mut self, now: Instant) {
        self.set_enabled(!self.session.enabled, now);
    }

    pub fn set_foreground_playing(&mut self, playing: bool, now: Instant) {
        self.foreground_playing = playing;
        self.reconcile(now);
    }

    /// Settle the pending start and run every fade tick due at `now`.
    pub fn advance(&mut self, now: Instant) {
        while let Some(event) = self.channel.next_event() {
            trace!(?event, "ambient telemetry");
        }

        if let Some(settled) = self.guard.poll(&mut self.channel) {
            match settled.result {
                Ok(()) => self.session.channel_playing = !settled.paused,
                Err(e) => {
                    // No retry here: the next change towards audible starts again.
                    warn!(error = %e, "ambient start rejected");
                    self.fade = None;
                    self.session.channel_playing = false;
                    self.set_level(0.0);
                    self.session.phase = AmbientPhase::Silent;
                }
            }
        }

        let Some(mut timer) = self.fade else {
            return;
        };
        let due = timer.take_due(now, self.config.tick);
        self.fade = Some(timer);
        for _ in 0..due {
            if self.fade.is_none() {
                break;
            }
            self.tick(timer.direction);
        }
    }

    /// Cancel the fade and release the channel.
    pub fn shutdown(&mut self) {
        self.fade = None;
        self.guard.abandon();
        self.channel.close(Duration::ZERO);
        self.session.channel_playing = false;
        self.session.volume = 0.0;
        self.session.phase = AmbientPhase::Silent;
    }

    fn reconcile(&mut self, now: Instant) {
        let target = self.target_active();
        match (target, self.session.phase) {
            (true, AmbientPhase::FadingIn | AmbientPhase::Audible)
            | (false, AmbientPhase::Silent | AmbientPhase::FadingOut) => {}
            (true, AmbientPhase::Silent | AmbientPhase::FadingOut) => {
                debug!(from = self.session.volume, "ambient fading in");
                if self.guard.is_pending() {
                    self.guard.withdraw_pause();
                } else if !self.session.channel_playing {
                    let pending = self.channel.play();
                    self.guard.begin(pending);
                }
                self.session.phase = AmbientPhase::FadingIn;
                self.fade = Some(FadeTimer::arm(FadeDirection::In, now, self.config.tick));
            }
            (false, AmbientPhase::FadingIn | AmbientPhase::Audible) => {
                debug!(from = self.session.volume, "ambient fading out");
                self.session.phase = AmbientPhase::FadingOut;
                self.fade = Some(FadeTimer::arm(FadeDirection::Out, now, self.config.tick));
            }
        }
    }

    fn tick(&mut self, direction: FadeDirection) {
        let (level, done) = step_level(
            self.session.volume,
            direction,
            self.config.step,
            self.config.ceiling,
        );
        self.set_level(level);
        if !done {
            return;
        }

        self.fade = None;
        match direction {
            FadeDirection::In => self.session.phase = AmbientPhase::Audible,
            FadeDirection::Out => {
                if self.guard.request_pause(&mut self.channel) {
                    self.session.channel_playing = false;
                }
                self.session.phase = AmbientPhase::Silent;
            }
        }
    }

    fn set_level(&mut self, level: f32) {
        let level = level.clamp(0.0, self.config.ceiling);
        self.session.volume = level;
        self.channel.set_volume(level);
    }
}
