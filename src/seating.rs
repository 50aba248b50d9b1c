//! Seat selection.
//!
//! Availability here is a simulation with no real inventory behind it: every
//! showtime query rolls fresh random availability, so re-querying the same
//! showtime yields a different map. A real system would replace
//! [`SeatAvailability::generate`] with a query against sold-seat records; the
//! interface (showtime in, purchasable seats out) and the UI contract
//! (changing showtime discards the in-progress selection) are what matter.

use rand::Rng;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use uuid::Uuid;

use crate::{
    cart::CartItem,
    movies::Movie,
    showtimes::{BASE_TICKET_PRICE_MINOR, Showtime},
};

/// Rows in the per-movie detail seat grid.
const DETAIL_ROWS: [char; 8] = ['A', 'B', 'C', 'D', 'E', 'F', 'G', 'H'];

/// Seats per row in the per-movie detail seat grid.
const DETAIL_SEATS_PER_ROW: u8 = 10;

/// Probability that any given seat is still purchasable.
const AVAILABLE_PROBABILITY: f64 = 0.7;

/// Seat-availability map for one showtime query.
#[derive(Debug, Clone, Default)]
pub struct SeatAvailability {
    seats: FxHashMap<String, bool>,
}

impl SeatAvailability {
    /// Roll availability for the fixed 8×10 detail grid.
    ///
    /// Each seat is available independently with probability 0.7.
    pub fn generate<R: Rng>(rng: &mut R) -> Self {
        let mut seats = FxHashMap::default();

        for row in DETAIL_ROWS {
            for number in 1..=DETAIL_SEATS_PER_ROW {
                seats.insert(
                    format!("{row}{number}"),
                    rng.gen_bool(AVAILABLE_PROBABILITY),
                );
            }
        }

        Self { seats }
    }

    /// Whether `label` exists in the grid and is purchasable.
    #[must_use]
    pub fn is_available(&self, label: &str) -> bool {
        self.seats.get(label).copied().unwrap_or(false)
    }

    /// Purchasable labels, sorted for stable display.
    pub fn available_labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = self
            .seats
            .iter()
            .filter(|(_, available)| **available)
            .map(|(label, _)| label.clone())
            .collect();

        labels.sort();
        labels
    }

    /// Number of seats in the grid.
    #[must_use]
    pub fn len(&self) -> usize {
        self.seats.len()
    }

    /// Whether no showtime has been queried yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }
}

/// Seat tier in the general seating plan.
///
/// Tiers exist in the seat model but carry no price difference in the
/// purchase flow; see [`SeatTier::price_minor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatTier {
    /// Front rows.
    Standard,

    /// Middle rows.
    Premium,

    /// Back rows.
    Vip,
}

impl SeatTier {
    /// Tier for a zero-based row index: front three rows standard, the next
    /// four premium, the rest vip.
    fn for_row(index: usize) -> Self {
        if index < 3 {
            Self::Standard
        } else if index < 7 {
            Self::Premium
        } else {
            Self::Vip
        }
    }

    /// Per-seat price for this tier in minor units.
    ///
    /// Extension point for tiered pricing. The purchase flow charges the flat
    /// base price for every tier; callers that want differentiated pricing
    /// override the result here rather than patching the checkout chain.
    #[must_use]
    pub fn price_minor(self, base_minor: u64) -> u64 {
        match self {
            Self::Standard | Self::Premium | Self::Vip => base_minor,
        }
    }
}

/// Occupancy status in the general seating plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatStatus {
    /// Free to select.
    Available,

    /// Part of the user's in-progress selection.
    Selected,

    /// Sold to someone else (simulated).
    Reserved,

    /// Blocked off, e.g. broken or distancing.
    Disabled,
}

/// A seat in the general seating plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    /// Label, e.g. "A-1".
    pub id: String,

    /// Row letter.
    pub row: char,

    /// Seat number within the row, starting at 1.
    pub number: u8,

    /// Pricing tier.
    pub tier: SeatTier,

    /// Occupancy status.
    pub status: SeatStatus,
}

/// General theater layout of up to 10 rows × 12 seats.
#[derive(Debug, Clone)]
pub struct SeatingPlan {
    seats: Vec<Seat>,
}

impl SeatingPlan {
    /// Maximum rows in a layout.
    pub const MAX_ROWS: usize = 10;

    /// Maximum seats per row in a layout.
    pub const MAX_SEATS_PER_ROW: u8 = 12;

    /// Generate a layout with randomly simulated occupancy: roughly 20% of
    /// seats pre-reserved and 5% disabled. Inputs beyond the layout maximums
    /// are truncated.
    pub fn generate<R: Rng>(rows: &[char], seats_per_row: u8, rng: &mut R) -> Self {
        let seats_per_row = seats_per_row.min(Self::MAX_SEATS_PER_ROW);
        let mut seats = Vec::with_capacity(Self::MAX_ROWS * usize::from(seats_per_row));

        for (row_index, row) in rows.iter().take(Self::MAX_ROWS).enumerate() {
            for number in 1..=seats_per_row {
                let roll: f64 = rng.gen_range(0.0..1.0);
                let status = if roll < 0.2 {
                    SeatStatus::Reserved
                } else if roll < 0.25 {
                    SeatStatus::Disabled
                } else {
                    SeatStatus::Available
                };

                seats.push(Seat {
                    id: format!("{row}-{number}"),
                    row: *row,
                    number,
                    tier: SeatTier::for_row(row_index),
                    status,
                });
            }
        }

        Self { seats }
    }

    /// The default ten-row, twelve-seat layout.
    pub fn default_layout<R: Rng>(rng: &mut R) -> Self {
        const ROWS: [char; 10] = ['A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J'];

        Self::generate(&ROWS, Self::MAX_SEATS_PER_ROW, rng)
    }

    /// All seats, row by row.
    #[must_use]
    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }
}

/// Transient, not-yet-committed seat selection for one showtime.
///
/// State machine: no showtime → showtime selected (no seats) → seats
/// partially selected → committed into a [`CartItem`]. Selecting a showtime
/// is destructive: availability is re-rolled and any in-progress selection is
/// discarded.
#[derive(Debug, Default)]
pub struct SeatSelection {
    showtime: Option<Showtime>,
    availability: SeatAvailability,
    selected: Vec<String>,
}

impl SeatSelection {
    /// Start with no showtime chosen.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Choose a showtime, re-rolling availability and clearing any
    /// in-progress seat selection.
    pub fn select_showtime<R: Rng>(&mut self, showtime: Showtime, rng: &mut R) {
        self.showtime = Some(showtime);
        self.availability = SeatAvailability::generate(rng);
        self.selected.clear();
    }

    /// Flip a seat in or out of the selection. Unavailable or unknown seats
    /// are ignored.
    pub fn toggle_seat(&mut self, label: &str) {
        if !self.availability.is_available(label) {
            return;
        }

        if let Some(position) = self.selected.iter().position(|seat| seat == label) {
            self.selected.remove(position);
        } else {
            self.selected.push(label.to_string());
        }
    }

    /// The chosen showtime, if any.
    #[must_use]
    pub fn showtime(&self) -> Option<&Showtime> {
        self.showtime.as_ref()
    }

    /// Seats currently selected, in selection order.
    #[must_use]
    pub fn selected_seats(&self) -> &[String] {
        &self.selected
    }

    /// Availability for the chosen showtime.
    #[must_use]
    pub fn availability(&self) -> &SeatAvailability {
        &self.availability
    }

    /// Commit the selection into a cart line for `movie`.
    ///
    /// Returns `None` until a showtime and at least one seat are chosen. On
    /// success the per-seat price is fixed at the base constant, the seats
    /// are handed over, and the selection resets to "showtime selected, no
    /// seats" for the next cycle.
    pub fn commit(&mut self, movie: &Movie) -> Option<CartItem> {
        let showtime = self.showtime.clone()?;

        if self.selected.is_empty() {
            return None;
        }

        let seats: SmallVec<[String; 8]> = self.selected.drain(..).collect();

        Some(CartItem {
            id: Uuid::new_v4(),
            movie_id: movie.id.clone(),
            movie_title: movie.title.clone(),
            movie_poster_url: movie.poster_url.clone(),
            showtime,
            seats,
            price_per_seat_minor: BASE_TICKET_PRICE_MINOR,
        })
    }
}
