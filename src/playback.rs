//! Playback coordination: the preview transport, the ambient bed and the mixer
//! that ties the two together.
//!
//! Both controllers exclusively own one `AudioChannel` each. The only coupling
//! between them is the preview's "is playing" signal, which the `Mixer`
//! forwards into the ambient controller after every telemetry pump.

mod ambient;
mod fade;
mod guard;
mod mixer;
mod preview;
mod session;

pub use ambient::{AmbientConfig, AmbientController};
pub use fade::{FadeDirection, FadeTimer};
pub use guard::StartGuard;
pub use mixer::Mixer;
pub use preview::PreviewController;
pub use session::*;

#[cfg(test)]
pub(crate) mod testing;
