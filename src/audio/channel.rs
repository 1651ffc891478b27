use std::time::Duration;

use super::types::{ChannelEvent, PendingStart};

/// A single audio output exclusively owned by one controller.
///
/// Everything that touches the host audio stack goes through this trait:
/// source loading, transport, volume and telemetry. Implementations must
/// deliver events in the order they happened and must never panic on a bad
/// source; failures are reported through the `PendingStart` of `play`.
pub trait AudioChannel {
    /// Replace the current source. Playback stops and the position resets.
    fn load(&mut self, locator: &str);

    /// Start or resume playback. The outcome settles asynchronously.
    fn play(&mut self) -> PendingStart;

    fn pause(&mut self);

    /// Move the playback position. Out-of-range values are clamped by the channel.
    fn seek(&mut self, position: Duration);

    /// Set the output gain in `[0, 1]`.
    fn set_volume(&mut self, level: f32);

    /// Whether the source restarts from the beginning when it ends.
    fn set_looping(&mut self, looping: bool);

    /// Next pending telemetry event, if any.
    fn next_event(&mut self) -> Option<ChannelEvent>;

    /// Release the output. `fade_out` of zero stops immediately.
    fn close(&mut self, fade_out: Duration) {
        let _ = fade_out;
    }
}
