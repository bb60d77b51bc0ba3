use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::definitions::KpiId;
use crate::arithmetic::{growth_rate, safe_div, safe_pct};
use crate::statements::{FinancialStatement, StatementPair};
use crate::types::{Money, Multiple, Percent};

/// Share of operating profit assumed to survive tax in the free cash flow
/// proxy. A simplification, not a tax computation.
pub const FCF_RETENTION: Decimal = dec!(0.6);

const DAYS_PER_YEAR: Decimal = dec!(365);
const MONTHS_PER_YEAR: Decimal = dec!(12);

// ---------------------------------------------------------------------------
// Single-period ratios
// ---------------------------------------------------------------------------

/// Ratios that need only one period's statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodRatios {
    pub operating_margin: Percent,
    pub fixed_asset_turnover: Multiple,
    pub inventory_days: Decimal,
    pub sales_per_employee: Money,
    pub op_profit_per_employee: Money,
    pub equity_ratio: Percent,
    pub loan_to_monthly_sales: Multiple,
    pub current_ratio: Percent,
    pub working_capital: Money,
    pub debt_repayment_years: Decimal,
}

impl PeriodRatios {
    pub fn compute(s: &FinancialStatement) -> Self {
        let i = &s.items;
        Self {
            operating_margin: safe_pct(s.op_profit, i.sales),
            fixed_asset_turnover: safe_div(i.sales, i.fixed_assets),
            inventory_days: safe_div(i.inventory, i.cogs / DAYS_PER_YEAR),
            sales_per_employee: safe_div(i.sales, s.employees()),
            op_profit_per_employee: safe_div(s.op_profit, s.employees()),
            equity_ratio: safe_pct(i.net_assets, s.total_assets),
            loan_to_monthly_sales: safe_div(s.interest_bearing_debt(), i.sales / MONTHS_PER_YEAR),
            current_ratio: safe_pct(s.current_assets, s.current_liab),
            working_capital: s.current_assets.saturating_sub(s.current_liab),
            debt_repayment_years: debt_repayment_years(s),
        }
    }

    fn get(&self, id: KpiId) -> Option<Decimal> {
        match id {
            KpiId::OperatingMargin => Some(self.operating_margin),
            KpiId::FixedAssetTurnover => Some(self.fixed_asset_turnover),
            KpiId::InventoryDays => Some(self.inventory_days),
            KpiId::SalesPerEmployee => Some(self.sales_per_employee),
            KpiId::OpProfitPerEmployee => Some(self.op_profit_per_employee),
            KpiId::EquityRatio => Some(self.equity_ratio),
            KpiId::LoanToMonthlySales => Some(self.loan_to_monthly_sales),
            KpiId::CurrentRatio => Some(self.current_ratio),
            KpiId::WorkingCapital => Some(self.working_capital),
            KpiId::DebtRepaymentYears => Some(self.debt_repayment_years),
            KpiId::FreeCashFlow | KpiId::SalesGrowth | KpiId::OpProfitGrowth => None,
        }
    }
}

/// Interest-bearing debt over repayment cash flow. A non-positive cash flow
/// reports zero rather than "undefined", so a loss-making company reads the
/// same as a debt-free one.
fn debt_repayment_years(s: &FinancialStatement) -> Decimal {
    let cash_flow = s.repayment_cash_flow();
    if cash_flow > Decimal::ZERO {
        safe_div(s.interest_bearing_debt(), cash_flow)
    } else {
        Decimal::ZERO
    }
}

// ---------------------------------------------------------------------------
// Full KPI set
// ---------------------------------------------------------------------------

/// Every KPI value for a statement pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiValues {
    pub current: PeriodRatios,
    pub prior: PeriodRatios,
    pub free_cash_flow: Money,
    /// `None` when prior sales are zero or negative
    pub sales_growth: Option<Percent>,
    /// `None` when prior operating profit is zero or negative
    pub op_profit_growth: Option<Percent>,
}

impl KpiValues {
    pub fn compute(pair: &StatementPair) -> Self {
        let (c, p) = (&pair.current, &pair.prior);
        Self {
            current: PeriodRatios::compute(c),
            prior: PeriodRatios::compute(p),
            free_cash_flow: free_cash_flow(c, p),
            sales_growth: growth_rate(c.items.sales, p.items.sales),
            op_profit_growth: growth_rate(c.op_profit, p.op_profit),
        }
    }

    /// Current-period value; `None` only for an undefined growth rate.
    pub fn current(&self, id: KpiId) -> Option<Decimal> {
        match id {
            KpiId::FreeCashFlow => Some(self.free_cash_flow),
            KpiId::SalesGrowth => self.sales_growth,
            KpiId::OpProfitGrowth => self.op_profit_growth,
            other => self.current.get(other),
        }
    }

    /// Prior-period value; `None` for KPIs without a prior baseline.
    pub fn prior(&self, id: KpiId) -> Option<Decimal> {
        self.prior.get(id)
    }
}

/// `op_profit × 0.6 + depreciation − (Δfixed_assets + depreciation)`.
///
/// Capex is approximated by the change in fixed assets plus depreciation.
/// Intermediate sums saturate at the decimal range.
pub fn free_cash_flow(current: &FinancialStatement, prior: &FinancialStatement) -> Money {
    let depreciation = current.items.depreciation;
    let capex = current
        .items
        .fixed_assets
        .saturating_sub(prior.items.fixed_assets)
        .saturating_add(depreciation);
    current
        .op_profit
        .saturating_mul(FCF_RETENTION)
        .saturating_add(depreciation)
        .saturating_sub(capex)
}
