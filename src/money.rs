//! Money

use rust_decimal::Decimal;
use rusty_money::{Money, iso};

/// Whether `code` is a known ISO 4217 currency code.
pub fn is_known_currency(code: &str) -> bool {
    iso::find(code).is_some()
}

/// Format `amount` in the currency identified by `code`.
///
/// Amounts are padded to the currency's minor units. Unknown codes fall back
/// to `"{amount} {code}"`.
pub fn format_amount(amount: Decimal, code: &str) -> String {
    let Some(currency) = iso::find(code) else {
        return format!("{amount} {code}");
    };

    let mut amount = amount;
    amount.rescale(currency.exponent);

    Money::from_decimal(amount, currency).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_known_currency() {
        assert_eq!(format_amount(Decimal::new(5000, 2), "USD"), "$50.00");
        assert_eq!(format_amount(Decimal::new(25, 0), "USD"), "$25.00");
    }

    #[test]
    fn falls_back_for_unknown_currency() {
        assert_eq!(format_amount(Decimal::new(12, 0), "XYZ"), "12 XYZ");
    }

    #[test]
    fn known_currency_codes() {
        assert!(is_known_currency("EUR"));
        assert!(!is_known_currency("ZZZ"));
    }
}
