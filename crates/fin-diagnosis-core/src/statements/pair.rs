use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::balance::BalanceCheck;
use super::record::{FinancialStatement, RawLineItems};

/// Current (latest) and prior period statements, derived independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementPair {
    pub current: FinancialStatement,
    pub prior: FinancialStatement,
}

impl StatementPair {
    pub fn from_raw(current: RawLineItems, prior: RawLineItems) -> Self {
        Self {
            current: FinancialStatement::from_raw(current),
            prior: FinancialStatement::from_raw(prior),
        }
    }

    /// Balance checks for (current, prior).
    pub fn balance_checks(&self) -> (BalanceCheck, BalanceCheck) {
        (BalanceCheck::of(&self.current), BalanceCheck::of(&self.prior))
    }

    /// Built-in sample company, used to demonstrate the report without
    /// typing in a full set of statements.
    pub fn sample() -> Self {
        let (current, prior) = sample_line_items();
        Self::from_raw(current, prior)
    }
}

/// Raw figures of the sample company as (current, prior).
pub fn sample_line_items() -> (RawLineItems, RawLineItems) {
    let current = RawLineItems {
        sales: dec!(100_000),
        cogs: dec!(70_000),
        depreciation: dec!(2_000),
        sga: dec!(25_000),
        non_op_inc: dec!(500),
        non_op_exp: dec!(500),
        extra_inc: dec!(0),
        extra_exp: dec!(0),
        tax: dec!(1_000),
        cash: dec!(15_000),
        receivables: dec!(12_000),
        inventory: dec!(5_000),
        other_ca: dec!(1_000),
        fixed_assets: dec!(20_000),
        payables: dec!(8_000),
        short_loan: dec!(10_000),
        other_cl: dec!(2_000),
        long_loan: dec!(20_000),
        net_assets: dec!(13_000),
        employees: 10,
    };
    let prior = RawLineItems {
        sales: dec!(90_000),
        cogs: dec!(63_000),
        depreciation: dec!(2_000),
        sga: dec!(24_000),
        non_op_inc: dec!(0),
        non_op_exp: dec!(500),
        extra_inc: dec!(0),
        extra_exp: dec!(0),
        tax: dec!(500),
        cash: dec!(10_000),
        receivables: dec!(10_000),
        inventory: dec!(4_000),
        other_ca: dec!(1_000),
        fixed_assets: dec!(20_000),
        payables: dec!(7_000),
        short_loan: dec!(10_000),
        other_cl: dec!(2_000),
        long_loan: dec!(22_000),
        net_assets: dec!(10_000),
        employees: 9,
    };
    (current, prior)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_current_balances() {
        let pair = StatementPair::sample();
        let (current, _) = pair.balance_checks();
        assert!(current.is_balanced());
        assert_eq!(pair.current.total_assets, dec!(53_000));
    }

    #[test]
    fn test_sample_prior_is_out_of_balance() {
        // 45000 of assets against 51000 of liabilities and net assets
        let pair = StatementPair::sample();
        let (_, prior) = pair.balance_checks();
        assert_eq!(prior.difference, dec!(-6_000));
    }

    #[test]
    fn test_sample_prior_op_profit() {
        let pair = StatementPair::sample();
        assert_eq!(pair.prior.op_profit, dec!(3_000));
        assert_eq!(pair.current.op_profit, dec!(5_000));
    }
}
