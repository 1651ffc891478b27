//! Beat catalog: track records and the providers that load them.
//!
//! The catalog is read once at startup, either from the built-in listing or
//! from a TOML file, and never mutated afterwards.

mod builtin;
mod load;
mod model;

pub use builtin::FEATURED_TAGS;
pub use model::*;
