//! Showtimes.
//!
//! A screening is identified by its `(theater, date, time)` tuple. The
//! schedule itself is simulated: every movie offers the same session times
//! and theaters over the next seven days.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

/// Base ticket price in centavos (R$ 29,90), flat for every seat.
pub const BASE_TICKET_PRICE_MINOR: u64 = 2990;

/// Session times offered on every screening day.
pub const SESSION_TIMES: [&str; 4] = ["14:00", "16:30", "19:00", "21:30"];

/// Theaters available for every session.
pub const THEATERS: [&str; 4] = ["Sala VIP 1", "Sala 2", "Sala 3D 3", "Sala IMAX 4"];

/// Number of days selectable on the booking screen.
pub const SCHEDULE_DAYS: usize = 7;

/// Identity of a single screening instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Showtime {
    /// Theater name.
    pub theater: String,

    /// Screening date.
    pub date: Date,

    /// Session time, e.g. "19:00".
    pub time: String,
}

impl Showtime {
    /// Create a showtime identity tuple.
    pub fn new(theater: impl Into<String>, date: Date, time: impl Into<String>) -> Self {
        Self {
            theater: theater.into(),
            date,
            time: time.into(),
        }
    }
}

/// Consecutive dates selectable for a session, starting at `from`.
pub fn upcoming_dates(from: Date, days: usize) -> Vec<Date> {
    let mut dates = Vec::with_capacity(days);
    let mut date = from;

    for _ in 0..days {
        dates.push(date);
        date = date.tomorrow().unwrap_or(date);
    }

    dates
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn upcoming_dates_are_consecutive() {
        let dates = upcoming_dates(date(2024, 12, 30), SCHEDULE_DAYS);

        assert_eq!(dates.len(), 7);
        assert_eq!(dates.first(), Some(&date(2024, 12, 30)));
        // Crosses the year boundary without skipping a day.
        assert_eq!(dates.last(), Some(&date(2025, 1, 5)));
    }

    #[test]
    fn showtime_identity_is_the_full_tuple() {
        let a = Showtime::new("Sala 2", date(2024, 1, 1), "19:00");
        let b = Showtime::new("Sala 2", date(2024, 1, 1), "19:00");
        let c = Showtime::new("Sala 2", date(2024, 1, 1), "21:30");

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn showtime_serializes_with_flat_fields() -> TestResult {
        let showtime = Showtime::new("Sala VIP 1", date(2024, 1, 1), "14:00");

        let json = serde_json::to_value(&showtime)?;

        assert_eq!(json.get("theater"), Some(&serde_json::json!("Sala VIP 1")));
        assert_eq!(json.get("date"), Some(&serde_json::json!("2024-01-01")));
        assert_eq!(json.get("time"), Some(&serde_json::json!("14:00")));

        Ok(())
    }
}
