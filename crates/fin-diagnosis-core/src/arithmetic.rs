use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::types::{Money, Percent};

const HUNDRED: Decimal = dec!(100);

/// Division that never fails: a zero denominator yields zero.
///
/// A ratio whose denominator line is empty (no fixed assets, no employees)
/// is reported as zero rather than aborting the whole report. A quotient
/// that would overflow the decimal range also collapses to zero.
pub fn safe_div(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator.is_zero() {
        return Decimal::ZERO;
    }
    numerator.checked_div(denominator).unwrap_or(Decimal::ZERO)
}

/// Period-over-period growth in percent.
///
/// Returns `None` when the previous figure is zero or negative: growth from
/// a non-positive base has no meaningful percentage. A change too large for
/// the decimal range is `None` as well.
pub fn growth_rate(current: Money, previous: Money) -> Option<Percent> {
    if previous <= Decimal::ZERO {
        return None;
    }
    current
        .checked_sub(previous)
        .and_then(|change| change.checked_div(previous))
        .and_then(|ratio| ratio.checked_mul(HUNDRED))
}

/// `safe_div(numerator, denominator) * 100`, zero on overflow.
pub fn safe_pct(numerator: Decimal, denominator: Decimal) -> Percent {
    safe_div(numerator, denominator)
        .checked_mul(HUNDRED)
        .unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_div_zero_denominator() {
        assert_eq!(safe_div(dec!(100), Decimal::ZERO), Decimal::ZERO);
        assert_eq!(safe_div(dec!(-5), Decimal::ZERO), Decimal::ZERO);
        assert_eq!(safe_div(Decimal::ZERO, Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_safe_div_regular() {
        assert_eq!(safe_div(dec!(100_000), dec!(20_000)), dec!(5));
        assert_eq!(safe_div(dec!(-30), dec!(4)), dec!(-7.5));
    }

    #[test]
    fn test_safe_div_overflow_collapses_to_zero() {
        assert_eq!(safe_div(Decimal::MAX, dec!(0.1)), Decimal::ZERO);
    }

    #[test]
    fn test_growth_rate_positive_base() {
        let g = growth_rate(dec!(100_000), dec!(90_000)).unwrap();
        assert_eq!(g.round_dp(2), dec!(11.11));
    }

    #[test]
    fn test_growth_rate_decline() {
        assert_eq!(growth_rate(dec!(50), dec!(100)), Some(dec!(-50)));
    }

    #[test]
    fn test_growth_rate_zero_base_is_undefined() {
        assert_eq!(growth_rate(dec!(100), Decimal::ZERO), None);
    }

    #[test]
    fn test_growth_rate_negative_base_is_undefined() {
        assert_eq!(growth_rate(dec!(50), dec!(-100)), None);
    }

    #[test]
    fn test_growth_rate_overflow_is_undefined() {
        assert_eq!(growth_rate(Decimal::MAX, dec!(1)), None);
        assert_eq!(growth_rate(Decimal::MIN, dec!(1)), None);
    }

    #[test]
    fn test_safe_pct_overflow_collapses_to_zero() {
        // the quotient fits, the percent scaling does not
        assert_eq!(safe_pct(Decimal::MAX, dec!(2)), Decimal::ZERO);
        assert_eq!(safe_pct(dec!(1_000_000_000_000_000_000_000_000_000), dec!(1)), Decimal::ZERO);
    }

    #[test]
    fn test_safe_pct() {
        assert_eq!(safe_pct(dec!(5_000), dec!(100_000)), dec!(5));
        assert_eq!(safe_pct(dec!(5_000), Decimal::ZERO), Decimal::ZERO);
    }
}
