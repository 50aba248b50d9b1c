//! Order summary rendering.
//!
//! A text-table rendering of the cart and quote, one line per reservation
//! followed by the derived totals. The UI layer renders its own markup; this
//! exists for logs, tests and terminal demos.

use rusty_money::{Money, iso};
use tabled::{builder::Builder, settings::Style};

use crate::cart::CartItem;

use super::{INSTALLMENT_OPTIONS, PaymentMethod, Quote};

/// Format minor units as Brazilian reais.
#[must_use]
pub fn format_brl(minor: u64) -> String {
    let minor = i64::try_from(minor).unwrap_or(i64::MAX);

    Money::from_minor(minor, iso::BRL).to_string()
}

/// Render the order summary as a table: one row per cart line, then
/// subtotal, service fee, the pix discount when it applies, and the total.
#[must_use]
pub fn render(items: &[CartItem], quote: &Quote) -> String {
    let mut builder = Builder::default();

    builder.push_record(["Item", "Seats", "Amount"].map(String::from));

    for item in items {
        builder.push_record([
            item.movie_title.clone(),
            item.seats.join(", "),
            format_brl(item.line_total_minor()),
        ]);
    }

    builder.push_record([
        "Subtotal".to_string(),
        String::new(),
        format_brl(quote.subtotal_minor()),
    ]);
    builder.push_record([
        "Service fee (10%)".to_string(),
        String::new(),
        format_brl(quote.service_fee_minor()),
    ]);

    if quote.method() == PaymentMethod::Pix {
        builder.push_record([
            "Pix discount (5%)".to_string(),
            String::new(),
            format!("-{}", format_brl(quote.discount_minor())),
        ]);
    }

    builder.push_record([
        "Total".to_string(),
        String::new(),
        format_brl(quote.total_minor()),
    ]);

    let mut table = builder.build();
    table.with(Style::rounded());

    table.to_string()
}

/// Installment lines offered for credit payment, no interest modeled.
#[must_use]
pub fn installment_lines(quote: &Quote) -> Vec<String> {
    INSTALLMENT_OPTIONS
        .iter()
        .map(|&n| {
            format!(
                "{n}x of {}, no interest",
                format_brl(quote.installment_minor(n))
            )
        })
        .collect()
}
