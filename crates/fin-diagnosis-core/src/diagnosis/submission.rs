//! Anonymised submission log.
//!
//! Each diagnosis can be appended as one flat row to an external
//! append-only store. The store is a collaborator behind
//! [`SubmissionSink`]; its failures are logged and swallowed so that they
//! never change the report a user sees.

use chrono::{DateTime, FixedOffset, Offset, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use tracing::{info, warn};

use super::report::{DiagnosisReport, SubmissionMetadata};
use crate::kpi::definitions::KpiId;
use crate::kpi::format::NOT_AVAILABLE;
use crate::statements::FinancialStatement;
use crate::{DiagnosisError, DiagnosisResult};

const JST_OFFSET_SECS: i32 = 9 * 3600;

/// KPI column order of a stored row. Differs from the display order.
pub const SUBMISSION_KPI_ORDER: [KpiId; 13] = [
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

const METADATA_COLUMNS: [&str; 5] = ["timestamp", "company_name", "region", "industry", "overall_score"];

/// Statement field names in stored order, raw and derived interleaved as
/// they appear on the statements.
pub const STATEMENT_FIELDS: [&str; 30] = [
    "sales",
    "cogs",
    "depreciation",
    "gross_profit",
    "sga",
    "op_profit",
    "non_op_inc",
    "non_op_exp",
    "ord_profit",
    "extra_inc",
    "extra_exp",
    "pre_tax_profit",
    "tax",
    "net_profit",
    "cash",
    "receivables",
    "inventory",
    "other_ca",
    "current_assets",
    "fixed_assets",
    "total_assets",
    "payables",
    "short_loan",
    "other_cl",
    "current_liab",
    "long_loan",
    "fixed_liab",
    "net_assets",
    "total_liab_equity",
    "employees",
];

// ---------------------------------------------------------------------------
// Cells
// ---------------------------------------------------------------------------

/// One scalar of an exported or stored row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Number(Decimal),
    Text(String),
    /// A value that does not exist; rendered as the "not available" marker
    Empty,
}

impl Cell {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    pub fn opt(value: Option<Decimal>) -> Self {
        value.map_or(Self::Empty, Self::Number)
    }
}

impl From<Decimal> for Cell {
    fn from(value: Decimal) -> Self {
        Self::Number(value)
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n.normalize()),
            Self::Text(s) => write!(f, "{s}"),
            Self::Empty => write!(f, "{NOT_AVAILABLE}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Row layout
// ---------------------------------------------------------------------------

/// Header names matching [`submission_row`].
pub fn submission_columns() -> Vec<String> {
    let mut cols: Vec<String> = METADATA_COLUMNS.iter().map(|c| c.to_string()).collect();
    for period in ["current", "prior"] {
        cols.extend(STATEMENT_FIELDS.iter().map(|f| format!("{period}_{f}")));
    }
    cols.extend(SUBMISSION_KPI_ORDER.iter().map(|k| k.key().to_string()));
    cols
}

fn statement_cells(s: &FinancialStatement) -> [Cell; 30] {
    let i = &s.items;
    [
        i.sales,
        i.cogs,
        i.depreciation,
        s.gross_profit,
        i.sga,
        s.op_profit,
        i.non_op_inc,
        i.non_op_exp,
        s.ord_profit,
        i.extra_inc,
        i.extra_exp,
        s.pre_tax_profit,
        i.tax,
        s.net_profit,
        i.cash,
        i.receivables,
        i.inventory,
        i.other_ca,
        s.current_assets,
        i.fixed_assets,
        s.total_assets,
        i.payables,
        i.short_loan,
        i.other_cl,
        s.current_liab,
        i.long_loan,
        s.fixed_liab,
        i.net_assets,
        s.total_liab_equity,
        s.employees(),
    ]
    .map(Cell::Number)
}

/// Flatten one diagnosis into the stored row: metadata, both periods'
/// statements, then every KPI for the current period.
pub fn submission_row(
    metadata: &SubmissionMetadata,
    timestamp: DateTime<FixedOffset>,
    report: &DiagnosisReport,
) -> Vec<Cell> {
    let mut row = vec![
        Cell::text(timestamp.to_rfc3339()),
        Cell::text(metadata.company_name.clone()),
        metadata.region.clone().map_or(Cell::Empty, Cell::Text),
        metadata
            .industry
            .map_or(Cell::Empty, |i| Cell::text(i.label())),
        Cell::Number(report.scorecard.overall),
    ];
    row.extend(statement_cells(&report.statements.current));
    row.extend(statement_cells(&report.statements.prior));
    row.extend(
        SUBMISSION_KPI_ORDER
            .iter()
            .map(|k| Cell::opt(report.values.current(*k))),
    );
    row
}

/// Current time at UTC+9, the zone submissions are stamped in.
pub fn now_jst() -> DateTime<FixedOffset> {
    let offset = FixedOffset::east_opt(JST_OFFSET_SECS).unwrap_or_else(|| Utc.fix());
    Utc::now().with_timezone(&offset)
}

// ---------------------------------------------------------------------------
// Sinks
// ---------------------------------------------------------------------------

/// An append-only store for submission rows.
pub trait SubmissionSink {
    fn append_row(&self, row: &[Cell]) -> DiagnosisResult<()>;
}

/// Append a row, fire-and-forget. Returns whether the store accepted it;
/// a failure is logged and otherwise ignored.
pub fn submit(sink: &dyn SubmissionSink, row: &[Cell]) -> bool {
    match sink.append_row(row) {
        Ok(()) => {
            info!(columns = row.len(), "submission recorded");
            true
        }
        Err(e) => {
            warn!(error = %e, "submission log append failed");
            false
        }
    }
}

/// In-process sink, for embedding and tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    rows: Mutex<Vec<Vec<Cell>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> Vec<Vec<Cell>> {
        self.rows.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl SubmissionSink for MemorySink {
    fn append_row(&self, row: &[Cell]) -> DiagnosisResult<()> {
        let mut rows = self
            .rows
            .lock()
            .map_err(|_| DiagnosisError::SubmissionFailed("memory sink lock poisoned".into()))?;
        rows.push(row.to_vec());
        Ok(())
    }
}
