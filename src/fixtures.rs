//! Fixtures.
//!
//! The demo catalog, demo accounts and the order history shown on the
//! "my orders" view, loaded from YAML files. The order history is pure
//! fixture data, independent of any checkout actually performed.

use std::{fs, path::PathBuf};

use jiff::civil::Date;
use serde::Deserialize;
use thiserror::Error;

use crate::{
    accounts::RegisteredUser,
    movies::{Catalog, Movie},
};

/// Fixture parsing errors.
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files.
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error.
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),
}

/// Fixture file loader rooted at a base path.
#[derive(Debug, Clone)]
pub struct Fixture {
    base_path: PathBuf,
}

impl Fixture {
    /// Loader over the default `./fixtures` directory.
    #[must_use]
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Loader over a custom base path.
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn read(&self, name: &str) -> Result<String, FixtureError> {
        Ok(fs::read_to_string(self.base_path.join(name))?)
    }

    /// Load the movie catalog from `movies.yml`.
    ///
    /// # Errors
    ///
    /// Returns a [`FixtureError`] if the file cannot be read or parsed.
    pub fn load_catalog(&self) -> Result<Catalog, FixtureError> {
        let fixture: MoviesFixture = serde_norway::from_str(&self.read("movies.yml")?)?;

        Ok(Catalog::new(fixture.movies))
    }

    /// Load the demo registered accounts from `users.yml`.
    ///
    /// # Errors
    ///
    /// Returns a [`FixtureError`] if the file cannot be read or parsed.
    pub fn load_users(&self) -> Result<Vec<RegisteredUser>, FixtureError> {
        let fixture: UsersFixture = serde_norway::from_str(&self.read("users.yml")?)?;

        Ok(fixture.users)
    }

    /// Load the fixture order history from `orders.yml`.
    ///
    /// # Errors
    ///
    /// Returns a [`FixtureError`] if the file cannot be read or parsed.
    pub fn load_order_history(&self) -> Result<Vec<HistoricalOrder>, FixtureError> {
        let fixture: OrdersFixture = serde_norway::from_str(&self.read("orders.yml")?)?;

        Ok(fixture.orders)
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Wrapper for the movie list in YAML.
#[derive(Debug, Deserialize)]
struct MoviesFixture {
    movies: Vec<Movie>,
}

/// Wrapper for the user list in YAML.
#[derive(Debug, Deserialize)]
struct UsersFixture {
    users: Vec<RegisteredUser>,
}

/// Wrapper for the order list in YAML.
#[derive(Debug, Deserialize)]
struct OrdersFixture {
    orders: Vec<HistoricalOrder>,
}

/// Status of a past order in the fixture history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Tickets used.
    Completed,

    /// Session not screened yet.
    Upcoming,

    /// Order cancelled.
    Cancelled,
}

/// A past order as shown on the "my orders" view.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HistoricalOrder {
    /// Display order number.
    pub order_number: String,

    /// Movie title.
    pub movie_title: String,

    /// Screening date.
    pub date: Date,

    /// Session time.
    pub time: String,

    /// Theater name.
    pub theater: String,

    /// Seat labels.
    pub seats: Vec<String>,

    /// Amount paid in minor units.
    pub total_minor: u64,

    /// Order status.
    pub status: OrderStatus,
}
