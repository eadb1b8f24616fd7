//! Money display helpers.

use rust_decimal::Decimal;
use rusty_money::{Money, iso};

/// Formats an amount in euros for display.
#[must_use]
pub fn format_eur(amount: Decimal) -> String {
    Money::from_decimal(amount, iso::EUR).to_string()
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::format_eur;

    #[test]
    fn formats_euro_amounts() {
        let formatted = format_eur(Decimal::new(1250, 2));

        assert!(
            formatted.contains("12") && formatted.contains("50"),
            "expected 12.50 euros, got {formatted}"
        );
    }
}
