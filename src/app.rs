//! Application context.
//!
//! Explicit session-scoped state: everything the UI layer needs, wired once
//! through dependency injection. Constructing the context is session init
//! (fixtures loaded, persisted cart restored); dropping it is teardown. The
//! façade methods here translate the typed results of cart and checkout
//! operations into toasts, keeping notification a UI concern rather than
//! part of each operation's contract.

use std::fmt;
use std::sync::Arc;

use jiff::Zoned;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    accounts::{AccountsService, User},
    cart::{Cart, CartError, CartItem},
    checkout::{
        CheckoutError, CheckoutService, Order, PaymentMethod, validation::PaymentForm,
    },
    email::Mailer,
    fixtures::{Fixture, FixtureError},
    movies::Catalog,
    notifications::{Notifier, Severity, Toast},
    storage::KeyValueStore,
};

/// Session initialization failures.
#[derive(Debug, Error)]
pub enum AppInitError {
    /// Fixture data could not be loaded.
    #[error("failed to load fixture data")]
    Fixtures(#[from] FixtureError),
}

/// Session-scoped application state.
pub struct AppContext {
    /// The read-only movie catalog.
    pub catalog: Catalog,

    /// The session's cart, restored from storage.
    pub cart: Cart,

    /// Registration and login.
    pub accounts: AccountsService,

    /// Order placement.
    pub checkout: CheckoutService,

    notifier: Arc<dyn Notifier>,
}

impl fmt::Debug for AppContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppContext")
            .field("catalog", &self.catalog.len())
            .field("cart", &self.cart)
            .finish_non_exhaustive()
    }
}

impl AppContext {
    /// Initialize a session from the default fixture directory.
    ///
    /// # Errors
    ///
    /// Returns an [`AppInitError`] when fixture data cannot be loaded.
    pub fn new(
        storage: Arc<dyn KeyValueStore>,
        notifier: Arc<dyn Notifier>,
        mailer: Arc<dyn Mailer>,
    ) -> Result<Self, AppInitError> {
        Self::with_fixture(&Fixture::new(), storage, notifier, mailer)
    }

    /// Initialize a session from a specific fixture loader.
    ///
    /// # Errors
    ///
    /// Returns an [`AppInitError`] when fixture data cannot be loaded.
    pub fn with_fixture(
        fixture: &Fixture,
        storage: Arc<dyn KeyValueStore>,
        notifier: Arc<dyn Notifier>,
        mailer: Arc<dyn Mailer>,
    ) -> Result<Self, AppInitError> {
        let catalog = fixture.load_catalog()?;
        let seed_users = fixture.load_users()?;

        let cart = Cart::load(Arc::clone(&storage));
        let accounts =
            AccountsService::new(Arc::clone(&storage), Arc::clone(&mailer), seed_users);
        let checkout = CheckoutService::new(mailer);

        Ok(Self {
            catalog,
            cart,
            accounts,
            checkout,
            notifier,
        })
    }

    /// Add a reservation to the cart, surfacing the outcome as a toast.
    ///
    /// # Errors
    ///
    /// Propagates the [`CartError`] after notifying, so callers can still
    /// branch on the rejection reason.
    pub fn add_to_cart(&mut self, item: CartItem) -> Result<(), CartError> {
        let tickets = item.seats.len();
        let title = item.movie_title.clone();

        match self.cart.add(item) {
            Ok(()) => {
                self.notifier.notify(Toast::new(
                    "Added to cart",
                    format!("{tickets} ticket(s) for {title}"),
                    Severity::Success,
                ));
                Ok(())
            }
            Err(error) => {
                let toast = match error {
                    CartError::DuplicateItem => Toast::new(
                        "Already in cart",
                        "These tickets are already in your cart",
                        Severity::Warning,
                    ),
                    CartError::SeatConflict => Toast::new(
                        "Seat conflict",
                        "You already hold some of these seats for the same session",
                        Severity::Warning,
                    ),
                };
                self.notifier.notify(toast);
                Err(error)
            }
        }
    }

    /// Remove a cart line and confirm it with a toast.
    pub fn remove_from_cart(&mut self, id: Uuid) {
        self.cart.remove(id);
        self.notifier.notify(Toast::new(
            "Item removed",
            "The item was removed from your cart",
            Severity::Info,
        ));
    }

    /// Empty the cart and confirm it with a toast.
    pub fn clear_cart(&mut self) {
        self.cart.clear();
        self.notifier.notify(Toast::new(
            "Cart cleared",
            "All items were removed from your cart",
            Severity::Info,
        ));
    }

    /// Place the order for the signed-in buyer, surfacing the outcome as a
    /// toast.
    ///
    /// # Errors
    ///
    /// Propagates the underlying [`CheckoutError`] after notifying.
    pub async fn place_order(
        &mut self,
        buyer: &User,
        form: &PaymentForm,
        method: PaymentMethod,
    ) -> Result<Order, CheckoutError> {
        let now = Zoned::now();

        match self
            .checkout
            .place_order(&mut self.cart, buyer, form, method, &now)
            .await
        {
            Ok(order) => {
                self.notifier.notify(Toast::new(
                    "Order placed",
                    format!("Your tickets were sent by email (order #{})", order.order_number),
                    Severity::Success,
                ));
                Ok(order)
            }
            Err(error) => {
                let toast = match &error {
                    CheckoutError::EmptyCart => Toast::new(
                        "Cart is empty",
                        "Add tickets before checking out",
                        Severity::Warning,
                    ),
                    CheckoutError::Invalid(_) => Toast::new(
                        "Check the payment form",
                        "Fix the highlighted fields and try again",
                        Severity::Warning,
                    ),
                };
                self.notifier.notify(toast);
                Err(error)
            }
        }
    }
}
