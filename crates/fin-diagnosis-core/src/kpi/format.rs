use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use super::definitions::Unit;

/// Marker for a value that does not exist (no prior baseline, undefined
/// growth). Never rendered as zero.
pub const NOT_AVAILABLE: &str = "-";

/// Render a value with the formatter selected by its unit.
pub fn format_value(value: Option<Decimal>, unit: Unit) -> String {
    match value {
        Some(v) => format_decimal(v, unit),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// `current - prior`, or `None` when either side is missing or the
/// difference leaves the decimal range.
pub fn delta(current: Option<Decimal>, prior: Option<Decimal>) -> Option<Decimal> {
    current?.checked_sub(prior?)
}

/// The delta formatted with the same unit rule as the values themselves.
pub fn format_delta(current: Option<Decimal>, prior: Option<Decimal>, unit: Unit) -> String {
    format_value(delta(current, prior), unit)
}

fn format_decimal(v: Decimal, unit: Unit) -> String {
    match unit {
        Unit::Currency | Unit::Headcount => format!("{} {}", group_thousands(v), unit.label()),
        Unit::Percentage => format!("{:.1}{}", round(v, 1), unit.label()),
        Unit::Turnover => format!("{:.2} {}", round(v, 2), unit.label()),
        Unit::Multiple => format!("{:.2}{}", round(v, 2), unit.label()),
        Unit::Years | Unit::Days | Unit::Points => {
            format!("{:.1} {}", round(v, 1), unit.label())
        }
    }
}

fn round(v: Decimal, dp: u32) -> Decimal {
    let r = v.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    if r.is_zero() {
        // drop the sign of a negative value that rounds to zero
        Decimal::ZERO
    } else {
        r
    }
}

/// Truncate toward zero and insert thousands separators.
fn group_thousands(v: Decimal) -> String {
    let whole = v.trunc().to_i128().unwrap_or(0);
    let digits = whole.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if whole < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_currency_grouping() {
        assert_eq!(format_value(Some(dec!(1234567)), Unit::Currency), "1,234,567 k");
        assert_eq!(format_value(Some(dec!(999)), Unit::Currency), "999 k");
        assert_eq!(format_value(Some(dec!(1000)), Unit::Currency), "1,000 k");
        assert_eq!(format_value(Some(dec!(0)), Unit::Currency), "0 k");
    }

    #[test]
    fn test_currency_truncates_toward_zero() {
        assert_eq!(format_value(Some(dec!(3333.9)), Unit::Currency), "3,333 k");
        assert_eq!(format_value(Some(dec!(-1500.7)), Unit::Currency), "-1,500 k");
        assert_eq!(format_value(Some(dec!(-0.4)), Unit::Currency), "0 k");
    }

    #[test]
    fn test_percentage_one_decimal() {
        assert_eq!(format_value(Some(dec!(5)), Unit::Percentage), "5.0%");
        assert_eq!(format_value(Some(dec!(31.707)), Unit::Percentage), "31.7%");
        assert_eq!(format_value(Some(dec!(11.15)), Unit::Percentage), "11.2%");
    }

    #[test]
    fn test_two_decimal_units() {
        assert_eq!(format_value(Some(dec!(5)), Unit::Turnover), "5.00 times");
        assert_eq!(format_value(Some(dec!(3.6)), Unit::Multiple), "3.60x");
    }

    #[test]
    fn test_years_and_days() {
        assert_eq!(format_value(Some(dec!(5)), Unit::Years), "5.0 yrs");
        assert_eq!(format_value(Some(dec!(26.0714)), Unit::Days), "26.1 days");
    }

    #[test]
    fn test_negative_zero_is_unsigned() {
        assert_eq!(format_value(Some(dec!(-0.01)), Unit::Percentage), "0.0%");
    }

    #[test]
    fn test_missing_value_placeholder() {
        assert_eq!(format_value(None, Unit::Currency), NOT_AVAILABLE);
        assert_eq!(format_value(None, Unit::Percentage), NOT_AVAILABLE);
    }

    #[test]
    fn test_delta_requires_both_sides() {
        assert_eq!(delta(Some(dec!(5)), Some(dec!(3))), Some(dec!(2)));
        assert_eq!(delta(Some(dec!(5)), None), None);
        assert_eq!(delta(None, Some(dec!(5))), None);
        assert_eq!(format_delta(Some(dec!(3000)), None, Unit::Currency), NOT_AVAILABLE);
        assert_eq!(delta(Some(Decimal::MAX), Some(Decimal::MIN)), None);
    }

    #[test]
    fn test_delta_uses_unit_rule() {
        assert_eq!(
            format_delta(Some(dec!(13000)), Some(dec!(6000)), Unit::Currency),
            "7,000 k"
        );
        assert_eq!(
            format_delta(Some(dec!(5)), Some(dec!(4.5)), Unit::Turnover),
            "0.50 times"
        );
    }
}
