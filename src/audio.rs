//! Audio output channels.
//!
//! `AudioChannel` is the seam between the playback controllers and the host
//! audio stack. `RodioChannel` implements it on top of a dedicated audio
//! thread that owns a `rodio` output stream and a single sink.

mod channel;
mod player;
mod sink;
mod thread;
mod types;

pub use channel::AudioChannel;
pub use player::RodioChannel;
pub use types::*;
