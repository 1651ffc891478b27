//! Application module: exposes the storefront model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and holds the catalog, selection,
//! search/tag filters, cart, ratings and the open overlay. Playback state is
//! owned by the `Mixer` and only projected here through `CardView`.

mod model;

pub use model::*;
