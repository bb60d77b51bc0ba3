use serde::{Deserialize, Serialize};

use super::format::{format_delta, format_value};
use super::ratios::KpiValues;
use crate::types::Money;

// ---------------------------------------------------------------------------
// Categories and units
// ---------------------------------------------------------------------------

/// The five axes of the health radar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Profitability,
    Growth,
    Efficiency,
    Productivity,
    Safety,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Profitability,
        Category::Growth,
        Category::Efficiency,
        Category::Productivity,
        Category::Safety,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Profitability => "Profitability",
            Self::Growth => "Growth",
            Self::Efficiency => "Efficiency",
            Self::Productivity => "Productivity",
            Self::Safety => "Safety",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Display unit; selects the formatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    Percentage,
    /// Thousands of the reporting currency
    Currency,
    /// Turnover count per period
    Turnover,
    Multiple,
    Years,
    Days,
    Headcount,
    Points,
}

impl Unit {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Percentage => "%",
            Self::Currency => "k",
            Self::Turnover => "times",
            Self::Multiple => "x",
            Self::Years => "yrs",
            Self::Days => "days",
            Self::Headcount => "persons",
            Self::Points => "pts",
        }
    }
}

// ---------------------------------------------------------------------------
// KPI catalogue
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KpiId {
    OperatingMargin,
    FreeCashFlow,
    SalesGrowth,
    OpProfitGrowth,
    FixedAssetTurnover,
    InventoryDays,
    SalesPerEmployee,
    OpProfitPerEmployee,
    EquityRatio,
    WorkingCapital,
    CurrentRatio,
    DebtRepaymentYears,
    LoanToMonthlySales,
}

impl KpiId {
    /// Report display order.
    pub const ALL: [KpiId; 13] = [
        KpiId::OperatingMargin,
        KpiId::FreeCashFlow,
        KpiId::SalesGrowth,
        KpiId::OpProfitGrowth,
        KpiId::FixedAssetTurnover,
        KpiId::InventoryDays,
        KpiId::SalesPerEmployee,
        KpiId::OpProfitPerEmployee,
        KpiId::EquityRatio,
        KpiId::WorkingCapital,
        KpiId::CurrentRatio,
        KpiId::DebtRepaymentYears,
        KpiId::LoanToMonthlySales,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::OperatingMargin => "Operating margin",
            Self::FreeCashFlow => "Free cash flow",
            Self::SalesGrowth => "Sales growth",
            Self::OpProfitGrowth => "Operating profit growth",
            Self::FixedAssetTurnover => "Fixed asset turnover",
            Self::InventoryDays => "Inventory days",
            Self::SalesPerEmployee => "Sales per employee",
            Self::OpProfitPerEmployee => "Operating profit per employee",
            Self::EquityRatio => "Equity ratio",
            Self::WorkingCapital => "Working capital",
            Self::CurrentRatio => "Current ratio",
            Self::DebtRepaymentYears => "Debt repayment years",
            Self::LoanToMonthlySales => "Loan to monthly sales",
        }
    }

    /// Stable snake_case key used for column names.
    pub fn key(&self) -> &'static str {
        match self {
            Self::OperatingMargin => "operating_margin",
            Self::FreeCashFlow => "free_cash_flow",
            Self::SalesGrowth => "sales_growth",
            Self::OpProfitGrowth => "op_profit_growth",
            Self::FixedAssetTurnover => "fixed_asset_turnover",
            Self::InventoryDays => "inventory_days",
            Self::SalesPerEmployee => "sales_per_employee",
            Self::OpProfitPerEmployee => "op_profit_per_employee",
            Self::EquityRatio => "equity_ratio",
            Self::WorkingCapital => "working_capital",
            Self::CurrentRatio => "current_ratio",
            Self::DebtRepaymentYears => "debt_repayment_years",
            Self::LoanToMonthlySales => "loan_to_monthly_sales",
        }
    }

    pub fn category(&self) -> Category {
        match self {
            Self::OperatingMargin | Self::FreeCashFlow => Category::Profitability,
            Self::SalesGrowth | Self::OpProfitGrowth => Category::Growth,
            Self::FixedAssetTurnover | Self::InventoryDays => Category::Efficiency,
            Self::SalesPerEmployee | Self::OpProfitPerEmployee => Category::Productivity,
            Self::EquityRatio
            | Self::WorkingCapital
            | Self::CurrentRatio
            | Self::DebtRepaymentYears
            | Self::LoanToMonthlySales => Category::Safety,
        }
    }

    pub fn unit(&self) -> Unit {
        match self {
            Self::OperatingMargin
            | Self::SalesGrowth
            | Self::OpProfitGrowth
            | Self::EquityRatio
            | Self::CurrentRatio => Unit::Percentage,
            Self::FreeCashFlow
            | Self::SalesPerEmployee
            | Self::OpProfitPerEmployee
            | Self::WorkingCapital => Unit::Currency,
            Self::FixedAssetTurnover => Unit::Turnover,
            Self::InventoryDays => Unit::Days,
            Self::DebtRepaymentYears => Unit::Years,
            Self::LoanToMonthlySales => Unit::Multiple,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::OperatingMargin => "Earning power of the core business",
            Self::FreeCashFlow => "Cash left for discretionary use",
            Self::SalesGrowth => "Expansion of market share",
            Self::OpProfitGrowth => {
                "Profit momentum; not applicable when the prior period made an operating loss"
            }
            Self::FixedAssetTurnover => "Utilisation of plant and equipment",
            Self::InventoryDays => "Speed at which stock turns over",
            Self::SalesPerEmployee => "Revenue scale per head",
            Self::OpProfitPerEmployee => "Value added per head",
            Self::EquityRatio => "Resistance to insolvency",
            Self::WorkingCapital => "Headroom for payments",
            Self::CurrentRatio => "Short-term repayment capacity",
            Self::DebtRepaymentYears => "Years needed to repay borrowings",
            Self::LoanToMonthlySales => "Appropriateness of the borrowing scale",
        }
    }

    pub fn formula(&self) -> &'static str {
        match self {
            Self::OperatingMargin => "Operating profit ÷ Sales",
            Self::FreeCashFlow => "Operating profit × 0.6 + Depreciation − Capex",
            Self::SalesGrowth => "(Current sales − Prior) ÷ Prior",
            Self::OpProfitGrowth => "(Current operating profit − Prior) ÷ Prior",
            Self::FixedAssetTurnover => "Sales ÷ Fixed assets",
            Self::InventoryDays => "Inventory ÷ (COGS ÷ 365)",
            Self::SalesPerEmployee => "Sales ÷ Employees",
            Self::OpProfitPerEmployee => "Operating profit ÷ Employees",
            Self::EquityRatio => "Net assets ÷ Total assets",
            Self::WorkingCapital => "Current assets − Current liabilities",
            Self::CurrentRatio => "Current assets ÷ Current liabilities",
            Self::DebtRepaymentYears => "Interest-bearing debt ÷ Cash flow",
            Self::LoanToMonthlySales => "Interest-bearing debt ÷ Monthly sales",
        }
    }

    /// Whether the KPI has a prior-period figure. Free cash flow and the two
    /// growth rates are inherently period-over-period.
    pub fn has_prior(&self) -> bool {
        !matches!(
            self,
            Self::FreeCashFlow | Self::SalesGrowth | Self::OpProfitGrowth
        )
    }
}

impl std::fmt::Display for KpiId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ---------------------------------------------------------------------------
// Evaluated KPI
// ---------------------------------------------------------------------------

/// One KPI as evaluated for a statement pair, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiDefinition {
    pub id: KpiId,
    pub name: String,
    pub category: Category,
    pub unit: Unit,
    pub current: Option<Money>,
    pub prior: Option<Money>,
    pub description: String,
    pub formula: String,
    pub current_display: String,
    pub prior_display: String,
    pub delta_display: String,
}

impl KpiDefinition {
    pub fn evaluate(id: KpiId, values: &KpiValues) -> Self {
        let current = values.current(id);
        let prior = values.prior(id);
        let unit = id.unit();
        Self {
            id,
            name: id.name().to_string(),
            category: id.category(),
            unit,
            current,
            prior,
            description: id.description().to_string(),
            formula: id.formula().to_string(),
            current_display: format_value(current, unit),
            prior_display: format_value(prior, unit),
            delta_display: format_delta(current, prior, unit),
        }
    }
}

/// Evaluate the whole catalogue in display order.
pub fn evaluate_all(values: &KpiValues) -> Vec<KpiDefinition> {
    KpiId::ALL
        .iter()
        .map(|id| KpiDefinition::evaluate(*id, values))
        .collect()
}
