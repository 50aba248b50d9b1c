//! Payment-instrument validation.
//!
//! Only the credit-card path validates fields; debit, boleto and pix need a
//! method selection and nothing else. Validation is all-or-nothing: every
//! failing field is reported in one pass so the form can render all errors
//! inline at once.

use jiff::civil::Date;
use rustc_hash::FxHashMap;

use super::{INSTALLMENT_OPTIONS, PaymentMethod};

/// Payment form fields, keyed for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// The card number.
    CardNumber,

    /// The name printed on the card.
    CardHolder,

    /// The MM/YY expiry date.
    Expiry,

    /// The security code.
    Cvv,

    /// The installment count.
    Installments,
}

/// Every failing field from one submission, reported together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: FxHashMap<Field, String>,
}

impl FieldErrors {
    fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.errors.insert(field, message.into());
    }

    /// The message for a field, if it failed.
    pub fn get(&self, field: Field) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    /// Iterate over failing fields and their messages.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.errors
            .iter()
            .map(|(field, message)| (*field, message.as_str()))
    }

    /// Number of failing fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Whether no field failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Raw payment form input, as typed by the user.
#[derive(Debug, Clone)]
pub struct PaymentForm {
    /// Card number; separators are tolerated and stripped.
    pub card_number: String,

    /// Name printed on the card.
    pub card_holder: String,

    /// Expiry in MM/YY.
    pub expiry: String,

    /// Security code.
    pub cvv: String,

    /// Chosen installment count (credit only).
    pub installments: u8,
}

impl Default for PaymentForm {
    /// A blank form pre-selecting single payment.
    fn default() -> Self {
        Self {
            card_number: String::new(),
            card_holder: String::new(),
            expiry: String::new(),
            cvv: String::new(),
            installments: 1,
        }
    }
}

/// Validate the form for the chosen payment method as of `today`.
///
/// # Errors
///
/// Returns [`FieldErrors`] listing every failing field. Methods other than
/// credit always validate.
pub fn validate(
    form: &PaymentForm,
    method: PaymentMethod,
    today: Date,
) -> Result<(), FieldErrors> {
    if method != PaymentMethod::Credit {
        return Ok(());
    }

    let mut errors = FieldErrors::default();

    if form.card_number.trim().is_empty() {
        errors.insert(Field::CardNumber, "card number is required");
    } else if !validate_card_number(&form.card_number) {
        errors.insert(Field::CardNumber, "invalid card number");
    }

    if form.card_holder.trim().is_empty() {
        errors.insert(Field::CardHolder, "cardholder name is required");
    }

    if form.expiry.trim().is_empty() {
        errors.insert(Field::Expiry, "expiry date is required");
    } else if !validate_expiry(&form.expiry, today) {
        errors.insert(Field::Expiry, "expiry date is invalid or in the past");
    }

    if form.cvv.trim().is_empty() {
        errors.insert(Field::Cvv, "security code is required");
    } else if !validate_cvv(&form.cvv) {
        errors.insert(Field::Cvv, "invalid security code");
    }

    if !INSTALLMENT_OPTIONS.contains(&form.installments) {
        errors.insert(Field::Installments, "invalid installment count");
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Luhn mod-10 check over the digits of `raw`, ignoring separators.
///
/// This catches typos, not fraud: 13 to 19 digits and a zero checksum are
/// all that is required.
#[must_use]
pub fn validate_card_number(raw: &str) -> bool {
    let digits: Vec<u32> = raw.chars().filter_map(|c| c.to_digit(10)).collect();

    if digits.len() < 13 || digits.len() > 19 {
        return false;
    }

    let sum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(position, &digit)| {
            if position % 2 == 1 {
                let doubled = digit * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                digit
            }
        })
        .sum();

    sum % 10 == 0
}

/// Strict `MM/YY` parse plus a not-expired check against `today`.
///
/// The comparison uses the two-digit year only, with no century handling;
/// dates wrap around relative to "now" once the two-digit space rolls over.
#[must_use]
pub fn validate_expiry(raw: &str, today: Date) -> bool {
    let Some((month_part, year_part)) = raw.split_once('/') else {
        return false;
    };

    if month_part.len() != 2
        || year_part.len() != 2
        || !month_part.bytes().all(|b| b.is_ascii_digit())
        || !year_part.bytes().all(|b| b.is_ascii_digit())
    {
        return false;
    }

    let Ok(month) = month_part.parse::<i8>() else {
        return false;
    };
    let Ok(year) = year_part.parse::<i16>() else {
        return false;
    };

    if !(1..=12).contains(&month) {
        return false;
    }

    let current_year = today.year().rem_euclid(100);
    let current_month = today.month();

    year > current_year || (year == current_year && month >= current_month)
}

/// CVV: exactly three or four digits.
#[must_use]
pub fn validate_cvv(raw: &str) -> bool {
    (raw.len() == 3 || raw.len() == 4) && raw.bytes().all(|b| b.is_ascii_digit())
}

/// Group card digits four at a time for display.
#[must_use]
pub fn format_card_number(raw: &str) -> String {
    let digits: Vec<u8> = raw
        .bytes()
        .filter(|b| b.is_ascii_digit())
        .collect();

    digits
        .chunks(4)
        .filter_map(|chunk| std::str::from_utf8(chunk).ok())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;

    #[test]
    fn luhn_accepts_a_valid_card_number() {
        assert!(validate_card_number("4532015112830366"));
        assert!(validate_card_number("4532 0151 1283 0366"));
    }

    #[test]
    fn luhn_rejects_a_single_digit_typo() {
        assert!(!validate_card_number("4532015112830367"));
    }

    #[test]
    fn card_number_length_must_be_13_to_19_digits() {
        // Too short / too long, regardless of checksum.
        assert!(!validate_card_number("4111111111"));
        assert!(!validate_card_number("41111111111111111111111"));
    }

    #[test]
    fn expiry_rejects_out_of_range_month() {
        assert!(!validate_expiry("13/25", date(2024, 6, 1)));
        assert!(!validate_expiry("00/25", date(2024, 6, 1)));
    }

    #[test]
    fn expiry_requires_exact_mm_yy_format() {
        let today = date(2024, 6, 1);

        assert!(!validate_expiry("1/25", today));
        assert!(!validate_expiry("01/2025", today));
        assert!(!validate_expiry("0125", today));
        assert!(!validate_expiry("ab/cd", today));
    }

    #[test]
    fn expiry_compares_two_digit_year_and_month() {
        let today = date(2025, 6, 15);

        // Earlier month of the current year is expired.
        assert!(!validate_expiry("01/25", today));
        // The current month is still valid.
        assert!(validate_expiry("06/25", today));
        // Later month and later year are valid.
        assert!(validate_expiry("07/25", today));
        assert!(validate_expiry("01/26", today));
        // Any month of an earlier two-digit year is expired.
        assert!(!validate_expiry("12/24", today));
    }

    #[test]
    fn cvv_is_three_or_four_digits() {
        assert!(validate_cvv("123"));
        assert!(validate_cvv("1234"));
        assert!(!validate_cvv("12"));
        assert!(!validate_cvv("12345"));
        assert!(!validate_cvv("12a"));
    }

    #[test]
    fn credit_reports_every_failing_field_at_once() {
        let form = PaymentForm::default();

        let errors = validate(&form, PaymentMethod::Credit, date(2024, 6, 1))
            .err()
            .unwrap_or_default();

        assert_eq!(errors.len(), 4);
        assert_eq!(
            errors.get(Field::CardNumber),
            Some("card number is required")
        );
        assert!(errors.get(Field::CardHolder).is_some());
        assert!(errors.get(Field::Expiry).is_some());
        assert!(errors.get(Field::Cvv).is_some());
    }

    #[test]
    fn invalid_values_report_different_messages_than_blanks() {
        let form = PaymentForm {
            card_number: "4532015112830367".to_string(),
            card_holder: "JOAO SILVA".to_string(),
            expiry: "13/30".to_string(),
            cvv: "12".to_string(),
            installments: 1,
        };

        let errors = validate(&form, PaymentMethod::Credit, date(2024, 6, 1))
            .err()
            .unwrap_or_default();

        assert_eq!(errors.len(), 3, "holder name is valid, the rest are not");
        assert_eq!(errors.get(Field::CardNumber), Some("invalid card number"));
        assert_eq!(errors.get(Field::CardHolder), None);
        assert_eq!(
            errors.get(Field::Expiry),
            Some("expiry date is invalid or in the past")
        );
        assert_eq!(errors.get(Field::Cvv), Some("invalid security code"));
    }

    fn filled_form() -> PaymentForm {
        PaymentForm {
            card_number: "4532015112830366".to_string(),
            card_holder: "JOAO SILVA".to_string(),
            expiry: "12/99".to_string(),
            cvv: "123".to_string(),
            installments: 1,
        }
    }

    #[test]
    fn credit_accepts_each_offered_installment_count() {
        for count in INSTALLMENT_OPTIONS {
            let form = PaymentForm {
                installments: count,
                ..filled_form()
            };

            assert!(validate(&form, PaymentMethod::Credit, date(2024, 6, 1)).is_ok());
        }
    }

    #[test]
    fn credit_rejects_an_out_of_range_installment_count() {
        for count in [0, 4, 12] {
            let form = PaymentForm {
                installments: count,
                ..filled_form()
            };

            let errors = validate(&form, PaymentMethod::Credit, date(2024, 6, 1))
                .err()
                .unwrap_or_default();

            assert_eq!(errors.len(), 1, "only the installment count is invalid");
            assert_eq!(
                errors.get(Field::Installments),
                Some("invalid installment count")
            );
        }
    }

    #[test]
    fn non_credit_methods_skip_field_validation() {
        let form = PaymentForm::default();
        let today = date(2024, 6, 1);

        assert!(validate(&form, PaymentMethod::Pix, today).is_ok());
        assert!(validate(&form, PaymentMethod::Debit, today).is_ok());
        assert!(validate(&form, PaymentMethod::Boleto, today).is_ok());
    }

    #[test]
    fn format_card_number_groups_by_four() {
        assert_eq!(
            format_card_number("4532015112830366"),
            "4532 0151 1283 0366"
        );
        assert_eq!(format_card_number("4532-0151-12"), "4532 0151 12");
        assert_eq!(format_card_number(""), "");
    }
}
