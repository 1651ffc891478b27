//! Client-side state holders: the shopping cart and the persisted ratings.

mod cart;
mod kv;
mod ratings;

pub use cart::Cart;
pub use kv::{LocalStore, StoreError};
pub use ratings::{RATINGS_KEY, RatingBook, RatingError};

#[cfg(test)]
mod tests;
