//! Marquee
//!
//! Marquee is the storefront core of a movie ticketing app: a persistent
//! shopping cart, a simulated seat map, and checkout pricing with payment
//! form validation, over pluggable storage, notification and email
//! collaborators.

pub mod accounts;
pub mod app;
pub mod cart;
pub mod checkout;
pub mod email;
pub mod fixtures;
pub mod movies;
pub mod notifications;
pub mod prelude;
pub mod seating;
pub mod showtimes;
pub mod storage;
