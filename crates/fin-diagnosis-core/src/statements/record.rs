use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::Money;

// ---------------------------------------------------------------------------
// Raw input
// ---------------------------------------------------------------------------

/// Line items for one period, as entered. Monetary amounts are whole
/// thousands of the reporting currency; absent fields default to zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawLineItems {
    // P/L
    pub sales: Money,
    pub cogs: Money,
    /// Depreciation included in cost of goods sold
    pub depreciation: Money,
    pub sga: Money,
    pub non_op_inc: Money,
    pub non_op_exp: Money,
    pub extra_inc: Money,
    pub extra_exp: Money,
    pub tax: Money,
    // B/S assets
    pub cash: Money,
    pub receivables: Money,
    pub inventory: Money,
    pub other_ca: Money,
    pub fixed_assets: Money,
    // B/S liabilities and equity
    pub payables: Money,
    pub short_loan: Money,
    pub other_cl: Money,
    pub long_loan: Money,
    pub net_assets: Money,
    // Other
    pub employees: u32,
}

// ---------------------------------------------------------------------------
// Derived record
// ---------------------------------------------------------------------------

/// One period's statement: the raw items plus every derived subtotal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialStatement {
    #[serde(flatten)]
    pub items: RawLineItems,
    pub gross_profit: Money,
    pub op_profit: Money,
    pub ord_profit: Money,
    pub pre_tax_profit: Money,
    pub net_profit: Money,
    pub current_assets: Money,
    pub total_assets: Money,
    pub current_liab: Money,
    pub fixed_liab: Money,
    pub total_liab_equity: Money,
}

impl FinancialStatement {
    /// Derive every subtotal. Sums saturate at the decimal range instead of
    /// overflowing, so arbitrarily large entries still produce a record.
    pub fn from_raw(items: RawLineItems) -> Self {
        let gross_profit = items.sales.saturating_sub(items.cogs);
        let op_profit = gross_profit.saturating_sub(items.sga);
        let ord_profit = op_profit
            .saturating_add(items.non_op_inc)
            .saturating_sub(items.non_op_exp);
        let pre_tax_profit = ord_profit
            .saturating_add(items.extra_inc)
            .saturating_sub(items.extra_exp);
        let net_profit = pre_tax_profit.saturating_sub(items.tax);

        let current_assets = items
            .cash
            .saturating_add(items.receivables)
            .saturating_add(items.inventory)
            .saturating_add(items.other_ca);
        let total_assets = current_assets.saturating_add(items.fixed_assets);

        let current_liab = items
            .payables
            .saturating_add(items.short_loan)
            .saturating_add(items.other_cl);
        let fixed_liab = items.long_loan;
        let total_liab_equity = current_liab
            .saturating_add(fixed_liab)
            .saturating_add(items.net_assets);

        Self {
            items,
            gross_profit,
            op_profit,
            ord_profit,
            pre_tax_profit,
            net_profit,
            current_assets,
            total_assets,
            current_liab,
            fixed_liab,
            total_liab_equity,
        }
    }

    /// Short-term plus long-term borrowings.
    pub fn interest_bearing_debt(&self) -> Money {
        self.items.short_loan.saturating_add(self.items.long_loan)
    }

    /// Cash available for debt service: ordinary profit + depreciation - tax.
    pub fn repayment_cash_flow(&self) -> Money {
        self.ord_profit
            .saturating_add(self.items.depreciation)
            .saturating_sub(self.items.tax)
    }

    pub fn employees(&self) -> Decimal {
        Decimal::from(self.items.employees)
    }
}

impl From<RawLineItems> for FinancialStatement {
    fn from(items: RawLineItems) -> Self {
        Self::from_raw(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn current_items() -> RawLineItems {
        RawLineItems {
            sales: dec!(100_000),
            cogs: dec!(70_000),
            depreciation: dec!(2_000),
            sga: dec!(25_000),
            non_op_inc: dec!(500),
            non_op_exp: dec!(500),
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
            ..Default::default()
        }
    }

    #[test]
    fn test_profit_cascade() {
        let s = FinancialStatement::from_raw(current_items());
        assert_eq!(s.gross_profit, dec!(30_000));
        assert_eq!(s.op_profit, dec!(5_000));
        assert_eq!(s.ord_profit, dec!(5_000));
        assert_eq!(s.pre_tax_profit, dec!(5_000));
        assert_eq!(s.net_profit, dec!(4_000));
    }

    #[test]
    fn test_balance_sheet_totals() {
        let s = FinancialStatement::from_raw(current_items());
        assert_eq!(s.current_assets, dec!(33_000));
        assert_eq!(s.total_assets, dec!(53_000));
        assert_eq!(s.current_liab, dec!(20_000));
        assert_eq!(s.fixed_liab, dec!(20_000));
        assert_eq!(s.total_liab_equity, dec!(53_000));
    }

    #[test]
    fn test_extraordinary_items_flow_to_pre_tax() {
        let mut items = current_items();
        items.extra_inc = dec!(300);
        items.extra_exp = dec!(1_300);
        let s = FinancialStatement::from_raw(items);
        assert_eq!(s.pre_tax_profit, dec!(4_000));
        assert_eq!(s.net_profit, dec!(3_000));
    }

    #[test]
    fn test_empty_items_derive_to_zero() {
        let s = FinancialStatement::from_raw(RawLineItems::default());
        assert_eq!(s.op_profit, Decimal::ZERO);
        assert_eq!(s.total_assets, Decimal::ZERO);
        assert_eq!(s.total_liab_equity, Decimal::ZERO);
    }

    #[test]
    fn test_debt_and_repayment_cash_flow() {
        let s = FinancialStatement::from_raw(current_items());
        assert_eq!(s.interest_bearing_debt(), dec!(30_000));
        // 5000 + 2000 - 1000
        assert_eq!(s.repayment_cash_flow(), dec!(6_000));
    }

    #[test]
    fn test_subtotals_saturate_at_decimal_range() {
        let s = FinancialStatement::from_raw(RawLineItems {
            sales: Decimal::MAX,
            cogs: Decimal::MIN,
            cash: Decimal::MAX,
            receivables: Decimal::MAX,
            short_loan: Decimal::MAX,
            long_loan: Decimal::MAX,
            ..Default::default()
        });
        assert_eq!(s.gross_profit, Decimal::MAX);
        assert_eq!(s.current_assets, Decimal::MAX);
        assert_eq!(s.total_assets, Decimal::MAX);
        assert_eq!(s.interest_bearing_debt(), Decimal::MAX);
    }

    #[test]
    fn test_missing_fields_default_to_zero() {
        let items: RawLineItems = serde_json::from_str(r#"{"sales": 1200, "employees": 3}"#).unwrap();
        assert_eq!(items.sales, dec!(1200));
        assert_eq!(items.cogs, Decimal::ZERO);
        assert_eq!(items.employees, 3);
    }
}
