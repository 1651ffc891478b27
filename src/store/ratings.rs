use std::collections::BTreeMap;

use thiserror::Error;
use tracing::{debug, warn};

use crate::catalog::TrackId;

use super::kv::{LocalStore, StoreError};

/// Store key holding the serialized rating map.
pub const RATINGS_KEY: &str = "franco_ratings";

#[derive(Debug, Error)]
pub enum RatingError {
    #[error("rating {0} is outside 1..=5")]
    InvalidValue(u8),
    #[error("unknown track {0}")]
    UnknownTrack(TrackId),
    #[error(transparent)]
    Persist(#[from] StoreError),
}

/// Star ratings per track, written through to a `LocalStore`.
#[derive(Debug)]
pub struct RatingBook {
    ratings: BTreeMap<TrackId, u8>,
    store: LocalStore,
}

impl RatingBook {
    /// Read ratings from `store`. A missing or corrupt entry yields an empty book.
    pub fn load(store: LocalStore) -> Self {
        let ratings = match store.get(RATINGS_KEY) {
            None => BTreeMap::new(),
            Some(raw) => match serde_json::from_str::<BTreeMap<TrackId, i64>>(raw) {
                Ok(map) => map
                    .into_iter()
                    .filter_map(|(id, v)| match u8::try_from(v) {
                        Ok(v) if (1..=5).contains(&v) => Some((id, v)),
                        _ => None,
                    })
                    .collect(),
                Err(e) => {
                    warn!(error = %e, "corrupt ratings entry, starting unrated");
                    BTreeMap::new()
                }
            },
        };
        debug!(count = ratings.len(), "ratings loaded");

        Self { ratings, store }
    }

    /// Rating of `id`, or 0 when unrated.
    pub fn rating(&self, id: &TrackId) -> u8 {
        self.ratings.get(id).copied().unwrap_or(0)
    }

    /// Record `value` for `id` and persist the whole map.
    ///
    /// The in-memory rating is kept even when persisting fails.
    pub fn rate(&mut self, id: &TrackId, value: u8) -> Result<(), RatingError> {
        if !(1..=5).contains(&value) {
            return Err(RatingError::InvalidValue(value));
        }
        self.ratings.insert(id.clone(), value);
        let raw = serde_json::to_string(&self.ratings).map_err(StoreError::from)?;
        self.store.set(RATINGS_KEY, raw)?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }

    /// Hand back the underlying store, e.g. to reload from it.
    pub fn into_store(self) -> LocalStore {
        self.store
    }
}
