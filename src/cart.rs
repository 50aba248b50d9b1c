//! Cart store.
//!
//! The authoritative list of seat reservations for the active session. The
//! cart is owned by one client session and mirrored write-through to durable
//! key-value storage on every successful mutation; no server ever sees it.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    showtimes::Showtime,
    storage::{CART_KEY, KeyValueStore},
};

/// Rejection reasons for cart mutations.
///
/// Mutations never partially apply: a rejected add leaves the cart untouched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// An item with the same id is already in the cart.
    #[error("these tickets are already in the cart")]
    DuplicateItem,

    /// Another item for the same showtime already reserves one of the seats.
    #[error("some of these seats are already reserved for the same showtime")]
    SeatConflict,
}

/// One reservation of seats for a single showtime of a single movie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Line identifier, generated client-side.
    pub id: Uuid,

    /// Catalog id of the movie.
    pub movie_id: String,

    /// Denormalized movie title for display.
    pub movie_title: String,

    /// Denormalized poster URL for display.
    pub movie_poster_url: String,

    /// The screening this reservation is for.
    #[serde(flatten)]
    pub showtime: Showtime,

    /// Seat labels, e.g. "G7". Non-empty, insertion-ordered.
    pub seats: SmallVec<[String; 8]>,

    /// Per-seat price in minor units, fixed when the selection was committed.
    pub price_per_seat_minor: u64,
}

impl CartItem {
    /// Price of this line in minor units.
    #[must_use]
    pub fn line_total_minor(&self) -> u64 {
        self.price_per_seat_minor * self.seats.len() as u64
    }

    /// Whether `other` reserves any of the same seats for the same showtime.
    fn conflicts_with(&self, other: &CartItem) -> bool {
        self.showtime == other.showtime
            && self.seats.iter().any(|seat| other.seats.contains(seat))
    }
}

/// The session's cart, persisted write-through to storage.
pub struct Cart {
    items: Vec<CartItem>,
    storage: Arc<dyn KeyValueStore>,
}

impl fmt::Debug for Cart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cart")
            .field("items", &self.items)
            .finish_non_exhaustive()
    }
}

impl Cart {
    /// Restore the cart from storage.
    ///
    /// An absent or unreadable payload yields an empty cart; corrupt state is
    /// logged and discarded, never propagated.
    pub fn load(storage: Arc<dyn KeyValueStore>) -> Self {
        let items = match storage.get(CART_KEY) {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(items) => items,
                Err(error) => {
                    tracing::warn!(%error, "discarding unreadable stored cart");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        Self { items, storage }
    }

    fn persist(&self) {
        match serde_json::to_string(&self.items) {
            Ok(raw) => self.storage.set(CART_KEY, &raw),
            Err(error) => tracing::warn!(%error, "failed to serialize cart"),
        }
    }

    /// Add a reservation to the cart.
    ///
    /// Insertion order is preserved for display. On success the whole cart is
    /// persisted.
    ///
    /// # Errors
    ///
    /// - [`CartError::DuplicateItem`] if an item with the same id exists.
    /// - [`CartError::SeatConflict`] if another item for the same
    ///   `(theater, date, time)` tuple already reserves one of the seats.
    pub fn add(&mut self, item: CartItem) -> Result<(), CartError> {
        if self.items.iter().any(|existing| existing.id == item.id) {
            return Err(CartError::DuplicateItem);
        }

        if self.items.iter().any(|existing| existing.conflicts_with(&item)) {
            return Err(CartError::SeatConflict);
        }

        self.items.push(item);
        self.persist();

        Ok(())
    }

    /// Remove the item with the given id; absent ids are a no-op.
    pub fn remove(&mut self, id: Uuid) {
        self.items.retain(|item| item.id != id);
        self.persist();
    }

    /// Empty the cart. Idempotent.
    pub fn clear(&mut self) {
        self.items.clear();
        self.persist();
    }

    /// Count of individual tickets (seats), not line items.
    #[must_use]
    pub fn total_tickets(&self) -> usize {
        self.items.iter().map(|item| item.seats.len()).sum()
    }

    /// Pre-fee, pre-discount subtotal in minor units.
    #[must_use]
    pub fn subtotal_minor(&self) -> u64 {
        self.items.iter().map(CartItem::line_total_minor).sum()
    }

    /// Whether every one of `seats` is already reserved by some item for
    /// `movie_id`. Used to pre-empt duplicate submissions from the detail
    /// view before an item is even built.
    #[must_use]
    pub fn contains_seats(&self, movie_id: &str, seats: &[String]) -> bool {
        self.items.iter().any(|item| {
            item.movie_id == movie_id && seats.iter().all(|seat| item.seats.contains(seat))
        })
    }

    /// The items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Number of line items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
