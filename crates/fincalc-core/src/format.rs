//! Locale/currency-aware rendering of numbers for the presentation layer.
//!
//! en-US style grouping with a configurable currency code and fraction
//! digit count. Pure string formatting, no business logic.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::types::{Currency, Money, Percent};

/// Display configuration for currency strings.
#[derive(Debug, Clone)]
pub struct CurrencyFormat {
    pub currency: Currency,
    pub fraction_digits: u32,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        CurrencyFormat {
            currency: Currency::USD,
            fraction_digits: 2,
        }
    }
}

fn symbol(currency: &Currency) -> Option<&'static str> {
    match currency {
        Currency::USD | Currency::CAD | Currency::AUD => Some("$"),
        Currency::GBP => Some("£"),
        Currency::EUR => Some("€"),
        Currency::JPY => Some("¥"),
        Currency::CHF | Currency::Other(_) => None,
    }
}

fn code(currency: &Currency) -> String {
    match currency {
        Currency::Other(c) => c.clone(),
        other => format!("{:?}", other),
    }
}

/// Insert en-US thousands separators into a plain digit string.
pub fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    let len = digits.len();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Format a monetary amount, e.g. `-1234.5` → `-$1,234.50`.
pub fn format_currency(amount: Money, fmt: &CurrencyFormat) -> String {
    let rounded = amount.round_dp_with_strategy(
        fmt.fraction_digits,
        RoundingStrategy::MidpointAwayFromZero,
    );
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let abs = rounded.abs();

    let plain = format!("{:.*}", fmt.fraction_digits as usize, abs);
    let (int_part, frac_part) = match plain.split_once('.') {
        Some((i, f)) => (i.to_string(), Some(f.to_string())),
        None => (plain, None),
    };

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    match symbol(&fmt.currency) {
        Some(sym) => out.push_str(sym),
        None => {
            out.push_str(&code(&fmt.currency));
            out.push(' ');
        }
    }
    out.push_str(&group_thousands(&int_part));
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(&frac);
    }
    out
}

/// Format a 0–100 percentage, e.g. `12.5` → `12.5%`.
pub fn format_percent(value: Percent, fraction_digits: u32) -> String {
    let rounded =
        value.round_dp_with_strategy(fraction_digits, RoundingStrategy::MidpointAwayFromZero);
    format!("{}%", rounded.normalize())
}

/// Format a plain decimal with grouping but no currency symbol.
pub fn format_number(value: Decimal, fraction_digits: u32) -> String {
    let rounded =
        value.round_dp_with_strategy(fraction_digits, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let plain = format!("{:.*}", fraction_digits as usize, rounded.abs());
    let (int_part, frac_part) = match plain.split_once('.') {
        Some((i, f)) => (i.to_string(), Some(f.to_string())),
        None => (plain, None),
    };

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&group_thousands(&int_part));
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(&frac);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_usd_grouping() {
        let fmt = CurrencyFormat::default();
        assert_eq!(format_currency(dec!(1234567.891), &fmt), "$1,234,567.89");
        assert_eq!(format_currency(dec!(0), &fmt), "$0.00");
        assert_eq!(format_currency(dec!(999.995), &fmt), "$1,000.00");
    }

    #[test]
    fn test_negative_amount() {
        let fmt = CurrencyFormat::default();
        assert_eq!(format_currency(dec!(-1234.5), &fmt), "-$1,234.50");
    }

    #[test]
    fn test_other_currency_code_prefix() {
        let fmt = CurrencyFormat {
            currency: Currency::Other("SEK".into()),
            fraction_digits: 0,
        };
        assert_eq!(format_currency(dec!(12500), &fmt), "SEK 12,500");
    }

    #[test]
    fn test_percent() {
        assert_eq!(format_percent(dec!(12.5), 1), "12.5%");
        assert_eq!(format_percent(dec!(28.004), 2), "28%");
    }
}
