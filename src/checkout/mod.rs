//! Checkout.
//!
//! Pricing, payment validation and order placement. The pricing chain is
//! computed in full decimal precision and rounded half-up only at the final
//! display step; rounding any intermediate stage would compound error across
//! subtotal, fee and discount.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use jiff::{Timestamp, Zoned};
use rand::Rng;
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

use crate::{
    accounts::User,
    cart::{Cart, CartItem},
    email::{EmailMessage, Mailer},
};

pub mod summary;
pub mod validation;

use validation::{FieldErrors, PaymentForm};

/// How the buyer pays. Only credit cards carry field validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Credit card, up to three interest-free installments.
    Credit,

    /// Debit card via bank redirect.
    Debit,

    /// Bank slip.
    Boleto,

    /// Instant transfer; carries an automatic 5% discount after the
    /// service fee.
    Pix,
}

/// Installment counts offered for credit payment.
pub const INSTALLMENT_OPTIONS: [u8; 3] = [1, 2, 3];

/// Derived totals for a cart subtotal under a payment method.
///
/// Amounts are held as unrounded decimals in minor units; the `_minor`
/// accessors round half-up at the display boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    method: PaymentMethod,
    subtotal: Decimal,
    service_fee: Decimal,
    total: Decimal,
}

impl Quote {
    /// Price a subtotal (in minor units) under the given payment method.
    ///
    /// The service fee is a flat 10% on the subtotal; pix then discounts the
    /// fee-inclusive amount by 5%.
    #[must_use]
    pub fn build(subtotal_minor: u64, method: PaymentMethod) -> Self {
        let subtotal = Decimal::from(subtotal_minor);
        let service_fee = subtotal * Decimal::new(10, 2);
        let gross = subtotal + service_fee;

        let total = match method {
            PaymentMethod::Pix => gross * Decimal::new(95, 2),
            PaymentMethod::Credit | PaymentMethod::Debit | PaymentMethod::Boleto => gross,
        };

        Self {
            method,
            subtotal,
            service_fee,
            total,
        }
    }

    /// The payment method this quote was built for.
    #[must_use]
    pub fn method(&self) -> PaymentMethod {
        self.method
    }

    /// Ticket subtotal in minor units.
    #[must_use]
    pub fn subtotal_minor(&self) -> u64 {
        to_minor(self.subtotal)
    }

    /// Service fee in minor units.
    #[must_use]
    pub fn service_fee_minor(&self) -> u64 {
        to_minor(self.service_fee)
    }

    /// Pix discount in minor units; zero for every other method.
    #[must_use]
    pub fn discount_minor(&self) -> u64 {
        to_minor(self.subtotal + self.service_fee - self.total)
    }

    /// Final payable amount in minor units.
    #[must_use]
    pub fn total_minor(&self) -> u64 {
        to_minor(self.total)
    }

    /// Per-installment amount for an n-way interest-free split.
    #[must_use]
    pub fn installment_minor(&self, installments: u8) -> u64 {
        let n = Decimal::from(installments.max(1));

        to_minor(self.total / n)
    }
}

/// Round half-up to whole minor units, only at the display boundary.
fn to_minor(amount: Decimal) -> u64 {
    amount
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u64()
        .unwrap_or(0)
}

/// Synthesize a display order number from the wall clock and a random
/// suffix: a prefix, the last six digits of epoch milliseconds, and a random
/// 0–999 segment. Pseudo-unique, good enough for a confirmation screen.
pub fn order_number<R: Rng>(now: Timestamp, rng: &mut R) -> String {
    let time_segment = now.as_millisecond().unsigned_abs() % 1_000_000;
    let suffix = rng.gen_range(0..1000);

    format!("ORD-{time_segment:06}-{suffix}")
}

/// Snapshot of a placed order.
///
/// Orders are never durably persisted; this exists only for the
/// confirmation view.
#[derive(Debug, Clone)]
pub struct Order {
    /// Display order number.
    pub order_number: String,

    /// The cart lines at checkout time.
    pub items: Vec<CartItem>,

    /// How the order was paid.
    pub method: PaymentMethod,

    /// Installment count the buyer chose; always 1 for single-payment
    /// methods.
    pub installments: u8,

    /// The totals the buyer agreed to.
    pub quote: Quote,
}

/// Why checkout refused to place an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The cart has nothing to pay for.
    #[error("the cart is empty")]
    EmptyCart,

    /// One or more payment fields failed validation.
    #[error("payment details failed validation")]
    Invalid(FieldErrors),
}

/// Order placement over a simulated payment processor.
pub struct CheckoutService {
    mailer: Arc<dyn Mailer>,
    payment_delay: Duration,
}

impl fmt::Debug for CheckoutService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckoutService")
            .field("payment_delay", &self.payment_delay)
            .finish_non_exhaustive()
    }
}

impl CheckoutService {
    /// Service with the default two-second simulated payment delay.
    pub fn new(mailer: Arc<dyn Mailer>) -> Self {
        Self::with_payment_delay(mailer, Duration::from_secs(2))
    }

    /// Service with a custom simulated payment delay.
    pub fn with_payment_delay(mailer: Arc<dyn Mailer>, payment_delay: Duration) -> Self {
        Self {
            mailer,
            payment_delay,
        }
    }

    /// Validate the payment, "process" it, email the confirmation and empty
    /// the cart.
    ///
    /// The chosen installment count is validated against
    /// [`INSTALLMENT_OPTIONS`] and echoed on the returned order; non-credit
    /// methods always record a single payment.
    ///
    /// The confirmation email carries the order number, every movie title in
    /// the order, the order date and the flattened seat list. A failed email
    /// is logged and never rolls back the order. There is no retry, timeout
    /// or cancellation: a caller that walks away mid-flight simply discards
    /// the result.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::EmptyCart`] when there is nothing to pay for.
    /// - [`CheckoutError::Invalid`] with every failing payment field.
    pub async fn place_order(
        &self,
        cart: &mut Cart,
        buyer: &User,
        form: &PaymentForm,
        method: PaymentMethod,
        now: &Zoned,
    ) -> Result<Order, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        validation::validate(form, method, now.date()).map_err(CheckoutError::Invalid)?;

        let installments = if method == PaymentMethod::Credit {
            form.installments
        } else {
            1
        };

        let quote = Quote::build(cart.subtotal_minor(), method);
        let order_number = order_number(now.timestamp(), &mut rand::thread_rng());

        // Simulated payment processing.
        tokio::time::sleep(self.payment_delay).await;

        let items = cart.items().to_vec();
        let confirmation = confirmation_email(buyer, &order_number, &items, now);

        if let Err(error) = self.mailer.send(confirmation).await {
            tracing::warn!(%error, order_number, "confirmation email failed");
        }

        cart.clear();

        tracing::debug!(
            order_number,
            total_minor = quote.total_minor(),
            "order placed"
        );

        Ok(Order {
            order_number,
            items,
            method,
            installments,
            quote,
        })
    }
}

/// Purchase-confirmation message for the buyer.
fn confirmation_email(
    buyer: &User,
    order_number: &str,
    items: &[CartItem],
    now: &Zoned,
) -> EmailMessage {
    let mut titles: Vec<&str> = Vec::new();
    for item in items {
        if !titles.contains(&item.movie_title.as_str()) {
            titles.push(item.movie_title.as_str());
        }
    }

    let seats: Vec<&str> = items
        .iter()
        .flat_map(|item| item.seats.iter().map(String::as_str))
        .collect();

    EmailMessage {
        to: buyer.email.clone(),
        subject: format!("Purchase confirmation - order #{order_number}"),
        template: "purchase-confirmation".to_string(),
        data: json!({
            "orderNumber": order_number,
            "movieTitles": titles,
            "date": now.date().to_string(),
            "seats": seats,
        }),
    }
}
