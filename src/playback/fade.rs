use std::time::{Duration, Instant};

/// Fade-outs finish once the level drops to or below this.
pub const FADE_FLOOR: f32 = 0.01;

// Absorbs f32 drift from repeated steps when approaching the ceiling.
const CEILING_TOLERANCE: f32 = 1e-4;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FadeDirection {
    In,
    Out,
}

/// A repeating fade tick. At most one exists per channel; arming a new one
/// replaces (and thereby cancels) the old one.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FadeTimer {
    pub direction: FadeDirection,
    next_due: Instant,
}

impl FadeTimer {
    /// Arm a timer whose first tick is one `interval` after `now`.
    pub fn arm(direction: FadeDirection, now: Instant, interval: Duration) -> Self {
        Self {
            direction,
            next_due: now + interval,
        }
    }

    pub fn next_due(&self) -> Instant {
        self.next_due
    }

    /// Count the ticks due at `now` and reschedule past them.
    pub fn take_due(&mut self, now: Instant, interval: Duration) -> u32 {
        let mut due = 0;
        while self.next_due <= now {
            due += 1;
            self.next_due += interval;
        }
        due
    }
}

/// One fade step from `level`. Returns the new level and whether the fade is done.
///
/// Fading in stops exactly at `ceiling`; fading out stops exactly at 0 once the
/// level reaches `FADE_FLOOR`.
pub fn step_level(level: f32, direction: FadeDirection, step: f32, ceiling: f32) -> (f32, bool) {
    match direction {
        FadeDirection::In => {
            let next = (level + step).min(ceiling);
            if next >= ceiling - CEILING_TOLERANCE {
                (ceiling, true)
            } else {
                (next, false)
            }
        }
        FadeDirection::Out => {
            let next = (level - step).max(0.0);
            if next <= FADE_FLOOR {
                (0.0, true)
            } else {
                (next, false)
            }
        }
    }
}
