use crate::catalog::{Catalog, TrackId};

/// Session-only shopping cart: an insertion-ordered set of track ids.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    ids: Vec<TrackId>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `id` unless already present. Returns whether the cart changed.
    pub fn add(&mut self, id: &TrackId) -> bool {
        if self.contains(id) {
            return false;
        }
        self.ids.push(id.clone());
        true
    }

    /// Remove `id` if present. Returns whether the cart changed.
    pub fn remove(&mut self, id: &TrackId) -> bool {
        let before = self.ids.len();
        self.ids.retain(|i| i != id);
        self.ids.len() != before
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn contains(&self, id: &TrackId) -> bool {
        self.ids.contains(id)
    }

    pub fn ids(&self) -> &[TrackId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Sum of the prices of the carted tracks still present in `catalog`.
    pub fn total(&self, catalog: &Catalog) -> f64 {
        self.ids
            .iter()
            .filter_map(|id| catalog.find(id))
            .map(|t| t.price)
            .sum()
    }
}
