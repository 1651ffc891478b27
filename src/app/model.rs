//! Application model types: `App`, `Overlay` and the per-card `CardView`.

use std::time::Duration;

use tracing::{info, warn};

use crate::catalog::{Catalog, FEATURED_TAGS, Track, TrackId};
use crate::playback::PlaybackSession;
use crate::store::{Cart, RatingBook, RatingError};

/// Modal layer drawn over the beat list. At most one is open.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Overlay {
    #[default]
    None,
    /// Full metadata of the selected track.
    Details,
    /// Cart contents and total.
    Cart,
    /// Waiting for the user to confirm buying this track.
    ConfirmPurchase(TrackId),
    /// Waiting for the user to confirm emptying the cart.
    ConfirmClearCart,
}

impl Overlay {
    pub fn is_confirmation(&self) -> bool {
        matches!(self, Overlay::ConfirmPurchase(_) | Overlay::ConfirmClearCart)
    }
}

/// What one catalog card shows, derived from the model and the playback session.
#[derive(Clone, Debug, PartialEq)]
pub struct CardView<'a> {
    pub track: &'a Track,
    /// The card's track is the one loaded in the preview channel.
    pub is_active: bool,
    pub is_playing: bool,
    /// Elapsed time of the preview; zero for inactive cards.
    pub elapsed: Duration,
    pub duration: Option<Duration>,
    pub in_cart: bool,
    /// 0 when unrated.
    pub rating: u8,
}

/// The main application model.
pub struct App {
    catalog: Catalog,
    ratings: RatingBook,
    pub cart: Cart,

    /// Catalog index of the highlighted card.
    pub selected: usize,

    pub filter_mode: bool,
    pub filter_query: String,
    pub tag_filter: Option<&'static str>,

    pub overlay: Overlay,
    /// One-line message shown in the status bar until the next action.
    pub notice: Option<String>,
}

impl App {
    /// Create a new `App` over `catalog` with previously persisted `ratings`.
    pub fn new(catalog: Catalog, ratings: RatingBook) -> Self {
        Self {
            catalog,
            ratings,
            cart: Cart::new(),
            selected: 0,
            filter_mode: false,
            filter_query: String::new(),
            tag_filter: None,
            overlay: Overlay::None,
            notice: None,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The highlighted track, if the current view shows any.
    pub fn selected_track(&self) -> Option<&Track> {
        if self.display_indices().contains(&self.selected) {
            self.catalog.get(self.selected)
        } else {
            None
        }
    }

    /// Catalog indices visible under the search query and tag filter, in catalog order.
    pub fn display_indices(&self) -> Vec<usize> {
        let query = self.filter_query.trim().to_lowercase();
        self.catalog
            .tracks()
            .iter()
            .enumerate()
            .filter(|(_, t)| query.is_empty() || t.matches_search(&query))
            .filter(|(_, t)| self.tag_filter.is_none_or(|tag| t.has_tag(tag)))
            .map(|(i, _)| i)
            .collect()
    }

    /// Return the next visible index in the current display order after `current`.
    /// Wraps around to the first element.
    pub fn next_in_view_from(&self, current: usize) -> Option<usize> {
        let display = self.display_indices();
        if display.is_empty() {
            return None;
        }

        let pos = display.iter().position(|&i| i == current);
        match pos {
            Some(p) => Some(display[(p + 1) % display.len()]),
            None => Some(display[0]),
        }
    }

    /// Return the previous visible index in the current display order before `current`.
    /// Wraps around to the last element.
    pub fn prev_in_view_from(&self, current: usize) -> Option<usize> {
        let display = self.display_indices();
        if display.is_empty() {
            return None;
        }

        let pos = display.iter().position(|&i| i == current);
        match pos {
            Some(0) | None => Some(display[display.len() - 1]),
            Some(p) => Some(display[p - 1]),
        }
    }

    /// Move selection to the next visible track.
    pub fn next(&mut self) {
        if let Some(next) = self.next_in_view_from(self.selected) {
            self.selected = next;
        }
    }

    /// Move selection to the previous visible track.
    pub fn prev(&mut self) {
        if let Some(prev) = self.prev_in_view_from(self.selected) {
            self.selected = prev;
        }
    }

    pub fn select_first(&mut self) {
        if let Some(&first) = self.display_indices().first() {
            self.selected = first;
        }
    }

    pub fn select_last(&mut self) {
        if let Some(&last) = self.display_indices().last() {
            self.selected = last;
        }
    }

    /// Select the card showing `id`, e.g. to follow the playing track.
    pub fn select_track(&mut self, id: &TrackId) {
        if let Some(idx) = self.catalog.position(id) {
            self.selected = idx;
            self.ensure_selected_visible();
        }
    }

    /// Enter filter mode: typed characters edit the search query.
    pub fn enter_filter_mode(&mut self) {
        self.filter_mode = true;
        self.ensure_selected_visible();
    }

    /// Leave filter mode, keeping the query applied.
    pub fn exit_filter_mode(&mut self) {
        self.filter_mode = false;
    }

    /// Clear the search query and leave filter mode.
    pub fn clear_filter(&mut self) {
        self.filter_query.clear();
        self.filter_mode = false;
        self.ensure_selected_visible();
    }

    pub fn push_filter_char(&mut self, c: char) {
        self.filter_query.push(c);
        self.ensure_selected_visible();
    }

    pub fn pop_filter_char(&mut self) {
        self.filter_query.pop();
        self.ensure_selected_visible();
    }

    /// Cycle the tag filter through the featured tags and back to none.
    pub fn cycle_tag(&mut self) {
        self.tag_filter = match self.tag_filter {
            None => FEATURED_TAGS.first().copied(),
            Some(tag) => FEATURED_TAGS
                .iter()
                .position(|t| *t == tag)
                .and_then(|i| FEATURED_TAGS.get(i + 1))
                .copied(),
        };
        self.ensure_selected_visible();
    }

    /// Ensure that `selected` is part of the current filtered view,
    /// otherwise move selection to the first visible track.
    fn ensure_selected_visible(&mut self) {
        let display = self.display_indices();
        if display.is_empty() {
            self.selected = 0;
            return;
        }

        if !display.contains(&self.selected) {
            self.selected = display[0];
        }
    }

    /// Add `id` to the cart. Unknown ids and duplicates leave the cart unchanged.
    pub fn add_to_cart(&mut self, id: &TrackId) -> bool {
        let Some(track) = self.catalog.find(id) else {
            return false;
        };
        let added = self.cart.add(id);
        self.notice = Some(if added {
            format!("Added {} to cart", track.title)
        } else {
            format!("{} is already in the cart", track.title)
        });
        added
    }

    pub fn remove_from_cart(&mut self, id: &TrackId) -> bool {
        let removed = self.cart.remove(id);
        if removed {
            if let Some(track) = self.catalog.find(id) {
                self.notice = Some(format!("Removed {} from cart", track.title));
            }
        }
        removed
    }

    pub fn clear_cart(&mut self) {
        self.cart.clear();
        self.notice = Some("Cart purged".to_string());
    }

    pub fn cart_total(&self) -> f64 {
        self.cart.total(&self.catalog)
    }

    /// Carted tracks in insertion order.
    pub fn cart_tracks(&self) -> Vec<&Track> {
        self.cart
            .ids()
            .iter()
            .filter_map(|id| self.catalog.find(id))
            .collect()
    }

    /// Record a star rating for a catalog track and persist it.
    pub fn rate(&mut self, id: &TrackId, value: u8) -> Result<(), RatingError> {
        if !self.catalog.contains(id) {
            return Err(RatingError::UnknownTrack(id.clone()));
        }
        self.ratings.rate(id, value)
    }

    /// Rate the selected track, reporting the outcome as a notice.
    pub fn rate_selected(&mut self, value: u8) {
        let Some(id) = self.selected_track().map(|t| t.id.clone()) else {
            return;
        };
        match self.rate(&id, value) {
            Ok(()) => self.notice = Some(format!("Rated {value}/5")),
            Err(RatingError::Persist(e)) => {
                warn!(track = %id, error = %e, "rating not persisted");
                self.notice = Some(format!("Rated {value}/5 (not saved: {e})"));
            }
            Err(e) => self.notice = Some(e.to_string()),
        }
    }

    pub fn rating(&self, id: &TrackId) -> u8 {
        self.ratings.rating(id)
    }

    pub fn toggle_details(&mut self) {
        self.overlay = match self.overlay {
            Overlay::Details => Overlay::None,
            _ if self.selected_track().is_some() => Overlay::Details,
            _ => Overlay::None,
        };
    }

    pub fn toggle_cart_overlay(&mut self) {
        self.overlay = match self.overlay {
            Overlay::Cart => Overlay::None,
            _ => Overlay::Cart,
        };
    }

    /// Ask for confirmation before buying the selected track.
    pub fn request_purchase(&mut self) {
        if let Some(id) = self.selected_track().map(|t| t.id.clone()) {
            self.overlay = Overlay::ConfirmPurchase(id);
        }
    }

    /// Ask for confirmation before emptying the cart. No-op on an empty cart.
    pub fn request_clear_cart(&mut self) {
        if !self.cart.is_empty() {
            self.overlay = Overlay::ConfirmClearCart;
        }
    }

    /// Accept the open confirmation dialog; other overlays just close.
    pub fn confirm(&mut self) {
        match std::mem::take(&mut self.overlay) {
            Overlay::ConfirmPurchase(id) => {
                if let Some(track) = self.catalog.find(&id) {
                    info!(track = %id, price = track.price, "simulated purchase confirmed");
                    self.notice = Some(format!(
                        "License for {} ({}) issued. No payment was taken.",
                        track.title,
                        track.price_label()
                    ));
                }
            }
            Overlay::ConfirmClearCart => self.clear_cart(),
            Overlay::None | Overlay::Details | Overlay::Cart => {}
        }
    }

    /// Close whatever overlay is open without acting on it.
    pub fn dismiss(&mut self) {
        self.overlay = Overlay::None;
    }

    /// Project catalog entry `index` against the current playback session.
    pub fn card_view<'a>(&'a self, index: usize, session: &PlaybackSession) -> Option<CardView<'a>> {
        let track = self.catalog.get(index)?;
        let is_active = session.is_current(&track.id);
        Some(CardView {
            track,
            is_active,
            is_playing: is_active && session.playing,
            elapsed: if is_active { session.elapsed } else { Duration::ZERO },
            duration: if is_active { session.duration } else { None },
            in_cart: self.cart.contains(&track.id),
            rating: self.ratings.rating(&track.id),
        })
    }
}
