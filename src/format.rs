use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::DisplayConfig;

/// Render a money amount for display, e.g. `$1,234.50` or `-$12.00`.
///
/// Purely presentational: stored amounts and JSON output keep full precision.
pub fn format_currency(value: Decimal, display: &DisplayConfig) -> String {
    let rounded = value.round_dp_with_strategy(
        display.currency_decimals,
        RoundingStrategy::MidpointAwayFromZero,
    );
    let negative = rounded.is_sign_negative() && !rounded.is_zero();

    let dp = display.currency_decimals as usize;
    let mut digits = format!("{:.dp$}", rounded.abs());
    if display.currency_grouping {
        digits = group_thousands(&digits);
    }

    let mut out = String::with_capacity(digits.len() + 2);
    if negative {
        out.push('-');
    }
    out.push_str(&display.currency_symbol);
    out.push_str(&digits);
    out
}

fn group_thousands(s: &str) -> String {
    let (int_part, frac_part) = match s.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (s, None),
    };

    let len = int_part.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (i, ch) in int_part.chars().enumerate() {
        grouped.push(ch);
        let remaining = len - i - 1;
        if remaining > 0 && remaining % 3 == 0 {
            grouped.push(',');
        }
    }

    match frac_part {
        Some(f) => format!("{grouped}.{f}"),
        None => grouped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn display(grouping: bool) -> DisplayConfig {
        DisplayConfig {
            currency_grouping: grouping,
            ..DisplayConfig::default()
        }
    }

    #[test]
    fn pads_to_two_decimals_by_default() {
        let d = Decimal::from(1000);
        assert_eq!(format_currency(d, &display(false)), "$1000.00");
    }

    #[test]
    fn groups_thousands_when_enabled() {
        let d = Decimal::from_str("1234567.5").unwrap();
        assert_eq!(format_currency(d, &display(true)), "$1,234,567.50");
    }

    #[test]
    fn negative_sign_precedes_symbol() {
        let d = Decimal::from_str("-1234.555").unwrap();
        assert_eq!(format_currency(d, &display(true)), "-$1,234.56");
    }

    #[test]
    fn honours_symbol_and_precision() {
        let config = DisplayConfig {
            currency_symbol: "€".to_string(),
            currency_decimals: 0,
            currency_grouping: false,
        };
        let d = Decimal::from_str("99.5").unwrap();
        assert_eq!(format_currency(d, &config), "€100");
    }

    #[test]
    fn rounds_tiny_negatives_to_unsigned_zero() {
        let d = Decimal::from_str("-0.001").unwrap();
        assert_eq!(format_currency(d, &display(false)), "$0.00");
    }
}
