//! Movie catalog.
//!
//! Read-only fixture data; no part of the storefront ever mutates it.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

/// Exhibition status of a catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MovieStatus {
    /// Currently screening; showtimes can be booked.
    NowShowing,

    /// Announced but not yet bookable.
    ComingSoon,
}

/// A movie in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movie {
    /// Catalog identifier.
    pub id: String,

    /// Display title.
    pub title: String,

    /// Poster image URL.
    pub poster_url: String,

    /// Backdrop image URL.
    pub backdrop_url: String,

    /// Release date.
    pub release_date: Date,

    /// Running time in minutes.
    pub duration_minutes: u32,

    /// Critic rating out of 10.
    pub rating: f32,

    /// Genre labels.
    pub genres: Vec<String>,

    /// Director name.
    pub director: String,

    /// Principal cast.
    pub cast: Vec<String>,

    /// Short synopsis.
    pub synopsis: String,

    /// Trailer URL, when one exists.
    #[serde(default)]
    pub trailer_url: Option<String>,

    /// Age-rating label, e.g. "PG-13".
    pub age_rating: String,

    /// Exhibition status.
    pub status: MovieStatus,
}

/// The fixture-backed movie catalog.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    movies: Vec<Movie>,
}

impl Catalog {
    /// Create a catalog from a list of movies.
    #[must_use]
    pub fn new(movies: Vec<Movie>) -> Self {
        Self { movies }
    }

    /// Look up a movie by id.
    pub fn get(&self, id: &str) -> Option<&Movie> {
        self.movies.iter().find(|movie| movie.id == id)
    }

    /// Movies currently screening.
    pub fn now_showing(&self) -> impl Iterator<Item = &Movie> {
        self.movies
            .iter()
            .filter(|movie| movie.status == MovieStatus::NowShowing)
    }

    /// Movies announced but not yet bookable.
    pub fn coming_soon(&self) -> impl Iterator<Item = &Movie> {
        self.movies
            .iter()
            .filter(|movie| movie.status == MovieStatus::ComingSoon)
    }

    /// Iterate over the whole catalog.
    pub fn iter(&self) -> impl Iterator<Item = &Movie> {
        self.movies.iter()
    }

    /// Number of catalog entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.movies.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }
}
