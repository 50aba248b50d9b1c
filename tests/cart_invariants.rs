//! Integration tests for cart persistence and seat-conflict rules.

use std::sync::Arc;

use jiff::civil::date;
use smallvec::SmallVec;
use testresult::TestResult;
use uuid::Uuid;

use marquee::{
    cart::{Cart, CartError, CartItem},
    showtimes::Showtime,
    storage::{CART_KEY, KeyValueStore, MemoryStore},
};

fn item(movie_id: &str, theater: &str, time: &str, seats: &[&str]) -> CartItem {
    CartItem {
        id: Uuid::new_v4(),
        movie_id: movie_id.to_string(),
        movie_title: format!("Movie {movie_id}"),
        movie_poster_url: String::new(),
        showtime: Showtime::new(theater, date(2024, 6, 1), time),
        seats: seats.iter().map(ToString::to_string).collect::<SmallVec<_>>(),
        price_per_seat_minor: 2990,
    }
}

#[test]
fn cart_round_trips_through_storage() -> TestResult {
    let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());

    let mut cart = Cart::load(Arc::clone(&storage));
    cart.add(item("1", "Sala 2", "19:00", &["A1", "A2"]))?;
    cart.add(item("2", "Sala 2", "19:00", &["B1"]))?;

    // A fresh session over the same storage sees the same cart.
    let restored = Cart::load(Arc::clone(&storage));

    assert_eq!(restored.len(), 2);
    assert_eq!(restored.total_tickets(), 3);
    assert_eq!(restored.subtotal_minor(), 3 * 2990);

    Ok(())
}

#[test]
fn overlapping_seats_for_the_same_session_are_rejected() -> TestResult {
    let mut cart = Cart::load(Arc::new(MemoryStore::new()));

    cart.add(item("1", "Sala 2", "19:00", &["A1", "A2"]))?;
    let conflict = cart.add(item("1", "Sala 2", "19:00", &["A2", "A3"]));

    assert_eq!(conflict, Err(CartError::SeatConflict));
    assert_eq!(cart.len(), 1);

    Ok(())
}

#[test]
fn disjoint_seats_for_the_same_session_are_accepted() -> TestResult {
    let mut cart = Cart::load(Arc::new(MemoryStore::new()));

    cart.add(item("1", "Sala 2", "19:00", &["A1", "A2"]))?;
    cart.add(item("1", "Sala 2", "19:00", &["A3", "A4"]))?;

    assert_eq!(cart.total_tickets(), 4);

    Ok(())
}

#[test]
fn same_seats_in_a_different_session_never_conflict() -> TestResult {
    let mut cart = Cart::load(Arc::new(MemoryStore::new()));

    cart.add(item("1", "Sala 2", "19:00", &["A1", "A2"]))?;
    cart.add(item("1", "Sala 2", "21:30", &["A1", "A2"]))?;
    cart.add(item("1", "Sala 3D 3", "19:00", &["A1", "A2"]))?;

    assert_eq!(cart.len(), 3);

    Ok(())
}

#[test]
fn clear_empties_the_cart_and_its_storage() -> TestResult {
    let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());

    let mut cart = Cart::load(Arc::clone(&storage));
    cart.add(item("1", "Sala 2", "19:00", &["A1"]))?;
    cart.clear();

    assert!(cart.is_empty());
    assert!(Cart::load(storage).is_empty());

    Ok(())
}

#[test]
fn corrupt_persisted_state_falls_back_to_an_empty_cart() {
    let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    storage.set(CART_KEY, "{not json");

    let cart = Cart::load(storage);

    assert!(cart.is_empty());
}
