use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unique identifier of a catalog track.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(String);

impl TrackId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A beat offered in the store.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Track {
    pub id: TrackId,
    pub title: String,
    /// Tempo in beats per minute.
    pub bpm: u32,
    /// Musical key, display only (e.g. "F# Min").
    pub key: String,
    pub price: f64,
    /// Locator of the preview audio, resolved by the audio channel.
    pub preview: String,
    /// Locator of the cover art, display only.
    #[serde(default)]
    pub artwork: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub description: String,
}

impl Track {
    /// Case-insensitive tag equality.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    /// Case-insensitive substring match on title or description.
    ///
    /// `query_lower` must already be lowercase.
    pub fn matches_search(&self, query_lower: &str) -> bool {
        if query_lower.is_empty() {
            return true;
        }
        self.title.to_lowercase().contains(query_lower)
            || self.description.to_lowercase().contains(query_lower)
    }

    pub fn price_label(&self) -> String {
        format!("${:.2}", self.price)
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed catalog: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("duplicate track id {0}")]
    DuplicateId(TrackId),
    #[error("track {0}: bpm must be positive")]
    InvalidBpm(TrackId),
    #[error("track {0}: price must be a non-negative number")]
    InvalidPrice(TrackId),
    #[error("track {0}: tags must be non-empty strings")]
    EmptyTag(TrackId),
}

/// Ordered, validated list of tracks.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    tracks: Vec<Track>,
}

impl Catalog {
    /// Validate `tracks` and build a catalog keeping their order.
    pub fn new(tracks: Vec<Track>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for track in &tracks {
            if !seen.insert(&track.id) {
                return Err(CatalogError::DuplicateId(track.id.clone()));
            }
            if track.bpm == 0 {
                return Err(CatalogError::InvalidBpm(track.id.clone()));
            }
            if !track.price.is_finite() || track.price < 0.0 {
                return Err(CatalogError::InvalidPrice(track.id.clone()));
            }
            if track.tags.iter().any(|t| t.trim().is_empty()) {
                return Err(CatalogError::EmptyTag(track.id.clone()));
            }
        }
        Ok(Self { tracks })
    }

    /// Build from a listing known to be valid.
    pub(super) fn from_validated(tracks: Vec<Track>) -> Self {
        debug_assert!(Self::new(tracks.clone()).is_ok());
        Self { tracks }
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn find(&self, id: &TrackId) -> Option<&Track> {
        self.tracks.iter().find(|t| &t.id == id)
    }

    pub fn position(&self, id: &TrackId) -> Option<usize> {
        self.tracks.iter().position(|t| &t.id == id)
    }

    pub fn contains(&self, id: &TrackId) -> bool {
        self.position(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}
