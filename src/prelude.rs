//! Marquee prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    accounts::{AccountsService, AuthError, MembershipLevel, RegisteredUser, Role, User},
    app::{AppContext, AppInitError},
    cart::{Cart, CartError, CartItem},
    checkout::{
        CheckoutError, CheckoutService, INSTALLMENT_OPTIONS, Order, PaymentMethod, Quote,
        order_number,
        summary::{format_brl, installment_lines, render},
        validation::{Field, FieldErrors, PaymentForm, format_card_number, validate},
    },
    email::{EmailMessage, Mailer, MailerError, SimulatedMailer},
    fixtures::{Fixture, FixtureError, HistoricalOrder, OrderStatus},
    movies::{Catalog, Movie, MovieStatus},
    seating::{Seat, SeatAvailability, SeatSelection, SeatStatus, SeatTier, SeatingPlan},
    showtimes::{BASE_TICKET_PRICE_MINOR, Showtime, upcoming_dates},
    storage::{KeyValueStore, MemoryStore},
};

pub use crate::notifications::{NoopNotifier, Notifier, RecordingNotifier, Severity, Toast};
