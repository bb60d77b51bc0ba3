use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::io;

use super::report::{DiagnosisReport, SubmissionMetadata};
use super::submission::Cell;
use crate::kpi::definitions::Unit;
use crate::kpi::format::NOT_AVAILABLE;
use crate::statements::FinancialStatement;
use crate::DiagnosisResult;

pub const EXPORT_HEADERS: [&str; 6] = ["section", "item", "current", "unit", "prior", "description"];

/// One line of the tabular export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRow {
    pub section: String,
    pub item: String,
    pub current: Cell,
    pub unit: String,
    pub prior: Cell,
    pub description: String,
}

impl ExportRow {
    fn info(item: &str, current: Cell, unit: &str) -> Self {
        Self {
            section: "Basic info".into(),
            item: item.into(),
            current,
            unit: unit.into(),
            prior: Cell::Empty,
            description: NOT_AVAILABLE.into(),
        }
    }

    pub fn to_record(&self) -> [String; 6] {
        [
            self.section.clone(),
            self.item.clone(),
            self.current.to_string(),
            self.unit.clone(),
            self.prior.to_string(),
            self.description.clone(),
        ]
    }
}

/// The statement lines included in an export: (section, item, unit).
fn statement_lines(s: &FinancialStatement) -> [(&'static str, &'static str, Decimal, Unit); 21] {
    let i = &s.items;
    [
        ("P/L", "Sales", i.sales, Unit::Currency),
        ("P/L", "Cost of goods sold", i.cogs, Unit::Currency),
        ("P/L", "Depreciation", i.depreciation, Unit::Currency),
        ("P/L", "Gross profit", s.gross_profit, Unit::Currency),
        ("P/L", "SG&A", i.sga, Unit::Currency),
        ("P/L", "Operating profit", s.op_profit, Unit::Currency),
        ("P/L", "Non-operating income", i.non_op_inc, Unit::Currency),
        ("P/L", "Non-operating expenses", i.non_op_exp, Unit::Currency),
        ("P/L", "Ordinary profit", s.ord_profit, Unit::Currency),
        ("P/L", "Extraordinary income", i.extra_inc, Unit::Currency),
        ("P/L", "Extraordinary losses", i.extra_exp, Unit::Currency),
        ("P/L", "Pre-tax profit", s.pre_tax_profit, Unit::Currency),
        ("P/L", "Taxes", i.tax, Unit::Currency),
        ("P/L", "Net profit", s.net_profit, Unit::Currency),
        ("B/S", "Current assets", s.current_assets, Unit::Currency),
        ("B/S", "Fixed assets", i.fixed_assets, Unit::Currency),
        ("B/S", "Total assets", s.total_assets, Unit::Currency),
        ("B/S", "Current liabilities", s.current_liab, Unit::Currency),
        ("B/S", "Fixed liabilities", s.fixed_liab, Unit::Currency),
        ("B/S", "Net assets", i.net_assets, Unit::Currency),
        ("Other", "Employees", s.employees(), Unit::Headcount),
    ]
}

/// Statement and KPI rows, without submission metadata.
pub fn statement_rows(report: &DiagnosisReport) -> Vec<ExportRow> {
    let current = statement_lines(&report.statements.current);
    let prior = statement_lines(&report.statements.prior);

    let mut rows: Vec<ExportRow> = current
        .iter()
        .zip(prior.iter())
        .map(|((section, item, c, unit), (_, _, p, _))| ExportRow {
            section: section.to_string(),
            item: item.to_string(),
            current: Cell::Number(*c),
            unit: unit.label().to_string(),
            prior: Cell::Number(*p),
            description: NOT_AVAILABLE.into(),
        })
        .collect();

    rows.extend(report.kpis.iter().map(|k| ExportRow {
        section: k.category.label().to_string(),
        item: k.name.clone(),
        current: Cell::opt(k.current),
        unit: k.unit.label().to_string(),
        prior: Cell::opt(k.prior),
        description: k.description.clone(),
    }));
    rows
}

/// Full export: diagnosis timestamp, company metadata and overall score,
/// followed by [`statement_rows`].
pub fn export_rows(
    metadata: &SubmissionMetadata,
    timestamp: DateTime<FixedOffset>,
    report: &DiagnosisReport,
) -> Vec<ExportRow> {
    let mut rows = vec![
        ExportRow::info("Diagnosed at", Cell::text(timestamp.to_rfc3339()), NOT_AVAILABLE),
        ExportRow::info("Company", Cell::text(metadata.company_name.clone()), NOT_AVAILABLE),
        ExportRow::info(
            "Region",
            metadata.region.clone().map_or(Cell::Empty, Cell::Text),
            NOT_AVAILABLE,
        ),
        ExportRow::info(
            "Industry",
            metadata.industry.map_or(Cell::Empty, |i| Cell::text(i.label())),
            NOT_AVAILABLE,
        ),
        ExportRow::info(
            "Overall score",
            Cell::Number(report.scorecard.overall),
            Unit::Points.label(),
        ),
    ];
    rows.extend(statement_rows(report));
    rows
}

/// Write rows as CSV with a header line.
pub fn write_csv<W: io::Write>(rows: &[ExportRow], writer: W) -> DiagnosisResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(EXPORT_HEADERS)?;
    for row in rows {
        wtr.write_record(row.to_record())?;
    }
    wtr.flush()?;
    Ok(())
}
