use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, warn};

use crate::kpi::definitions::{evaluate_all, KpiDefinition};
use crate::kpi::ratios::{KpiValues, FCF_RETENTION};
use crate::kpi::scoring::{score_kpis, Scorecard};
use crate::statements::pair::sample_line_items;
use crate::statements::{BalanceCheck, RawLineItems, StatementPair};
use crate::{types::*, DiagnosisError, DiagnosisResult};

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Industry {
    Manufacturing,
    Construction,
    Wholesale,
    Retail,
    Services,
    Other,
}

impl Industry {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Manufacturing => "Manufacturing",
            Self::Construction => "Construction",
            Self::Wholesale => "Wholesale",
            Self::Retail => "Retail",
            Self::Services => "Services",
            Self::Other => "Other",
        }
    }
}

impl std::fmt::Display for Industry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for Industry {
    type Err = DiagnosisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "manufacturing" => Ok(Self::Manufacturing),
            "construction" => Ok(Self::Construction),
            "wholesale" => Ok(Self::Wholesale),
            "retail" => Ok(Self::Retail),
            "services" | "service" => Ok(Self::Services),
            "other" => Ok(Self::Other),
            other => Err(DiagnosisError::InvalidInput {
                field: "industry".into(),
                reason: format!("Unknown industry '{other}'."),
            }),
        }
    }
}

/// Who the statements belong to. Company name may be a pseudonym.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmissionMetadata {
    pub company_name: String,
    pub industry: Option<Industry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

impl SubmissionMetadata {
    /// Gate applied before the engine runs; the engine itself never rejects
    /// figures.
    pub fn validate(&self) -> DiagnosisResult<()> {
        if self.company_name.trim().is_empty() {
            return Err(DiagnosisError::InvalidInput {
                field: "company_name".into(),
                reason: "Company name is required (a pseudonym is fine).".into(),
            });
        }
        if self.industry.is_none() {
            return Err(DiagnosisError::InvalidInput {
                field: "industry".into(),
                reason: "Select an industry.".into(),
            });
        }
        if let Some(region) = &self.region {
            if region.trim().is_empty() {
                return Err(DiagnosisError::InvalidInput {
                    field: "region".into(),
                    reason: "Region must not be blank when supplied.".into(),
                });
            }
        }
        Ok(())
    }
}

/// A full submission: metadata plus raw figures for both periods.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisInput {
    #[serde(flatten)]
    pub metadata: SubmissionMetadata,
    #[serde(default)]
    pub current: RawLineItems,
    #[serde(default)]
    pub prior: RawLineItems,
}

impl DiagnosisInput {
    pub fn statements(&self) -> StatementPair {
        StatementPair::from_raw(self.current.clone(), self.prior.clone())
    }

    /// The sample company with its metadata filled in.
    pub fn sample() -> Self {
        let (current, prior) = sample_line_items();
        Self {
            metadata: SubmissionMetadata {
                company_name: "Sample Trading Co.".into(),
                industry: Some(Industry::Manufacturing),
                region: Some("Tokyo".into()),
            },
            current,
            prior,
        }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceSummary {
    pub current: BalanceCheck,
    pub prior: BalanceCheck,
}

/// Everything derived from one statement pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisReport {
    pub statements: StatementPair,
    pub balance: BalanceSummary,
    pub values: KpiValues,
    /// KPI rows in display order
    pub kpis: Vec<KpiDefinition>,
    pub scorecard: Scorecard,
}

impl DiagnosisReport {
    pub fn overall_score(&self) -> Score {
        self.scorecard.overall
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnosis {
    pub metadata: SubmissionMetadata,
    pub report: DiagnosisReport,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Derive KPIs, scores and display strings for a statement pair.
///
/// Pure: the same pair always yields an identical report. Whether this runs
/// on every edit or once per explicit submission is the caller's choice.
pub fn evaluate(pair: &StatementPair) -> DiagnosisReport {
    let (current, prior) = pair.balance_checks();
    let values = KpiValues::compute(pair);
    let kpis = evaluate_all(&values);
    let scorecard = score_kpis(&values, pair);

    debug!(
        overall = %scorecard.overall,
        verdict = ?scorecard.verdict,
        "diagnosis evaluated"
    );

    DiagnosisReport {
        statements: pair.clone(),
        balance: BalanceSummary { current, prior },
        values,
        kpis,
        scorecard,
    }
}

/// Validate the submission and evaluate it inside the standard envelope.
/// Balance-sheet mismatches are reported as warnings.
pub fn diagnose(input: &DiagnosisInput) -> DiagnosisResult<ComputationOutput<Diagnosis>> {
    let start = Instant::now();
    input.metadata.validate()?;

    let report = evaluate(&input.statements());

    let mut warnings: Vec<String> = Vec::new();
    for (label, check) in [
        ("current", &report.balance.current),
        ("prior", &report.balance.prior),
    ] {
        if !check.is_balanced() {
            warn!(period = label, difference = %check.difference, "balance sheet mismatch");
            warnings.push(format!(
                "The {label} period balance sheet does not balance: total assets {} vs liabilities and net assets {} (difference {}).",
                check.total_assets, check.total_liab_equity, check.difference
            ));
        }
    }

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "unit": "thousands of reporting currency",
        "fcf_retention": FCF_RETENTION.to_string(),
        "capex_proxy": "change in fixed assets + depreciation",
        "growth_base": "undefined when the prior figure is zero or negative",
        "zero_denominator": "ratio reported as 0",
        "debt_repayment_years": "0 when ordinary profit + depreciation - tax is not positive",
        "turnaround_override": "operating profit growth scores 5 when the prior operating profit <= 0 and the current one > 0",
        "days_per_year": 365
    });

    Ok(with_metadata(
        "Two-period financial ratio diagnosis (5 categories, 1-5 threshold scoring)",
        &assumptions,
        warnings,
        elapsed,
        Diagnosis {
            metadata: input.metadata.clone(),
            report,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_sample_overall_score() {
        let report = evaluate(&StatementPair::sample());
        assert_eq!(report.overall_score(), dec!(3.8));
        assert_eq!(report.kpis.len(), 13);
    }

    #[test]
    fn test_evaluate_is_deterministic() {
        let pair = StatementPair::sample();
        let first = evaluate(&pair);
        for _ in 0..5 {
            assert_eq!(evaluate(&pair), first);
        }
    }

    #[test]
    fn test_diagnose_sample_warns_on_prior_mismatch() {
        let out = diagnose(&DiagnosisInput::sample()).unwrap();
        assert_eq!(out.warnings.len(), 1);
        assert!(out.warnings[0].contains("prior"));
        assert_eq!(out.metadata.precision, "rust_decimal_128bit");
    }

    #[test]
    fn test_blank_company_rejected() {
        let mut input = DiagnosisInput::sample();
        input.metadata.company_name = "   ".into();
        let err = diagnose(&input).unwrap_err();
        match err {
            DiagnosisError::InvalidInput { field, .. } => assert_eq!(field, "company_name"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_industry_rejected() {
        let mut input = DiagnosisInput::sample();
        input.metadata.industry = None;
        let err = diagnose(&input).unwrap_err();
        match err {
            DiagnosisError::InvalidInput { field, .. } => assert_eq!(field, "industry"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_region_optional_but_not_blank() {
        let mut input = DiagnosisInput::sample();
        input.metadata.region = None;
        assert!(input.metadata.validate().is_ok());
        input.metadata.region = Some(String::new());
        assert!(input.metadata.validate().is_err());
    }

    #[test]
    fn test_industry_from_str() {
        assert_eq!("Retail".parse::<Industry>().unwrap(), Industry::Retail);
        assert_eq!(" service ".parse::<Industry>().unwrap(), Industry::Services);
        assert!("mining".parse::<Industry>().is_err());
    }

    #[test]
    fn test_input_json_shape() {
        let json = r#"{
            "company_name": "Acme",
            "industry": "retail",
            "current": {"sales": 1000, "cogs": 600},
            "prior": {"sales": 900}
        }"#;
        let input: DiagnosisInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.metadata.industry, Some(Industry::Retail));
        assert_eq!(input.metadata.region, None);
        assert_eq!(input.current.cogs, dec!(600));
        assert_eq!(input.prior.cogs, dec!(0));
    }
}
