//! Presentation helpers shared by table renderers: currency and percentage
//! strings, and lenient parsing of user-typed figures.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::types::{Money, Rate};

/// How negative currency amounts are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NegativeStyle {
    /// `-$1,234.56`
    #[default]
    LeadingMinus,
    /// `($1,234.56)`, accounting style
    Parentheses,
}

/// Round to cents, half away from zero (what users expect on a statement).
pub fn round_cents(value: Money) -> Money {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Group the integer digits of a non-negative, already rounded amount.
fn group_thousands(value: Money) -> String {
    let text = format!("{value:.2}");
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*ch);
    }
    format!("{grouped}.{frac_part}")
}

/// Format as `$#,##0.00`. Amounts that round to zero never carry a sign.
pub fn format_currency(value: Money, style: NegativeStyle) -> String {
    let rounded = round_cents(value);
    let body = format!("${}", group_thousands(rounded.abs()));
    if rounded.is_sign_negative() && !rounded.is_zero() {
        match style {
            NegativeStyle::LeadingMinus => format!("-{body}"),
            NegativeStyle::Parentheses => format!("({body})"),
        }
    } else {
        body
    }
}

/// Format a decimal rate as `0.00%` (0.0625 => `6.25%`).
pub fn format_percent(rate: Rate) -> String {
    let pct = (rate * dec!(100)).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{pct:.2}%")
}

/// Percentage for an optional ratio such as loan-to-value; `N/A` when undefined.
pub fn format_optional_percent(rate: Option<Rate>) -> String {
    rate.map(format_percent).unwrap_or_else(|| "N/A".to_string())
}

/// Parse a user-typed amount such as `$1,234.50` or `-1,200`.
///
/// Everything other than digits, `-` and `.` is ignored; unparseable input
/// yields zero rather than an error.
pub fn parse_currency(text: &str) -> Money {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '-' || *c == '.')
        .collect();
    let negative = cleaned.starts_with('-');
    let unsigned: String = cleaned.chars().filter(|c| *c != '-').collect();
    match unsigned.parse::<Decimal>() {
        Ok(v) if negative => -v,
        Ok(v) => v,
        Err(_) => Decimal::ZERO,
    }
}

/// Convert a float from an untyped source; NaN and infinities become zero.
pub fn decimal_or_zero(value: f64) -> Decimal {
    if !value.is_finite() {
        return Decimal::ZERO;
    }
    Decimal::from_f64(value).unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_grouping() {
        assert_eq!(format_currency(dec!(1234567.891), NegativeStyle::LeadingMinus), "$1,234,567.89");
        assert_eq!(format_currency(dec!(999.5), NegativeStyle::LeadingMinus), "$999.50");
        assert_eq!(format_currency(dec!(0), NegativeStyle::LeadingMinus), "$0.00");
    }

    #[test]
    fn test_currency_negative_styles() {
        assert_eq!(format_currency(dec!(-1200), NegativeStyle::LeadingMinus), "-$1,200.00");
        assert_eq!(format_currency(dec!(-1200), NegativeStyle::Parentheses), "($1,200.00)");
    }

    #[test]
    fn test_negative_zero_has_no_sign() {
        assert_eq!(format_currency(dec!(-0.001), NegativeStyle::LeadingMinus), "$0.00");
    }

    #[test]
    fn test_percent() {
        assert_eq!(format_percent(dec!(0.0625)), "6.25%");
        assert_eq!(format_percent(dec!(0.8)), "80.00%");
        assert_eq!(format_optional_percent(None), "N/A");
    }

    #[test]
    fn test_parse_currency() {
        assert_eq!(parse_currency("$1,234.50"), dec!(1234.50));
        assert_eq!(parse_currency("-1,200.00"), dec!(-1200.00));
        assert_eq!(parse_currency("abc"), Decimal::ZERO);
        assert_eq!(parse_currency(""), Decimal::ZERO);
    }

    #[test]
    fn test_decimal_or_zero() {
        assert_eq!(decimal_or_zero(f64::NAN), Decimal::ZERO);
        assert_eq!(decimal_or_zero(f64::INFINITY), Decimal::ZERO);
        assert_eq!(decimal_or_zero(2000.0), dec!(2000));
    }
}
