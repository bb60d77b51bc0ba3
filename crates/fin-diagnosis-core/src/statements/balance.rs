use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::record::FinancialStatement;
use crate::types::Money;

/// Result of comparing total assets with liabilities plus net assets.
///
/// A mismatch is a warning only: every ratio is still computed on the
/// figures as entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceCheck {
    pub total_assets: Money,
    pub total_liab_equity: Money,
    /// `total_assets - total_liab_equity`
    pub difference: Money,
}

impl BalanceCheck {
    pub fn of(statement: &FinancialStatement) -> Self {
        Self {
            total_assets: statement.total_assets,
            total_liab_equity: statement.total_liab_equity,
            difference: statement
                .total_assets
                .saturating_sub(statement.total_liab_equity),
        }
    }

    pub fn is_balanced(&self) -> bool {
        self.difference == Decimal::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statements::RawLineItems;
    use rust_decimal_macros::dec;

    #[test]
    fn test_balanced_sheet() {
        let s = FinancialStatement::from_raw(RawLineItems {
            cash: dec!(1_000),
            fixed_assets: dec!(500),
            payables: dec!(700),
            net_assets: dec!(800),
            ..Default::default()
        });
        let check = BalanceCheck::of(&s);
        assert!(check.is_balanced());
        assert_eq!(check.difference, Decimal::ZERO);
    }

    #[test]
    fn test_mismatch_reports_signed_difference() {
        let s = FinancialStatement::from_raw(RawLineItems {
            cash: dec!(1_000),
            payables: dec!(300),
            net_assets: dec!(900),
            ..Default::default()
        });
        let check = BalanceCheck::of(&s);
        assert!(!check.is_balanced());
        assert_eq!(check.difference, dec!(-200));
    }
}
