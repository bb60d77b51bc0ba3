use chrono::{DateTime, FixedOffset};
use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use fin_diagnosis_core::diagnosis::export;
use fin_diagnosis_core::diagnosis::submission::now_jst;
use fin_diagnosis_core::diagnosis::{self, DiagnosisInput};
use fin_diagnosis_core::kpi::scoring::Direction;
use fin_diagnosis_core::kpi::{score, SCORE_RULES};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Diagnosis
// ---------------------------------------------------------------------------

#[napi]
pub fn diagnose(input_json: String) -> NapiResult<String> {
    let input: DiagnosisInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = diagnosis::diagnose(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[derive(Deserialize)]
struct ExportInput {
    #[serde(flatten)]
    input: DiagnosisInput,
    /// Defaults to the current time in UTC+9
    #[serde(default)]
    timestamp: Option<DateTime<FixedOffset>>,
}

#[napi]
pub fn export_rows(input_json: String) -> NapiResult<String> {
    let req: ExportInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    req.input.metadata.validate().map_err(to_napi_error)?;
    let report = diagnosis::evaluate(&req.input.statements());
    let rows = export::export_rows(
        &req.input.metadata,
        req.timestamp.unwrap_or_else(now_jst),
        &report,
    );
    serde_json::to_string(&rows).map_err(to_napi_error)
}

#[napi]
pub fn sample_input() -> NapiResult<String> {
    serde_json::to_string(&DiagnosisInput::sample()).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct ScoreValueInput {
    value: Option<Decimal>,
    thresholds: [Decimal; 4],
    #[serde(default)]
    lower_is_better: bool,
}

#[napi]
pub fn score_value(input_json: String) -> NapiResult<u32> {
    let req: ScoreValueInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    Ok(u32::from(score(req.value, req.thresholds, req.lower_is_better)))
}

#[derive(Serialize)]
struct RuleRow {
    kpi: &'static str,
    category: &'static str,
    thresholds: [Decimal; 4],
    lower_is_better: bool,
}

#[napi]
pub fn score_rules() -> NapiResult<String> {
    let rows: Vec<RuleRow> = SCORE_RULES
        .iter()
        .map(|(kpi, rule)| RuleRow {
            kpi: kpi.key(),
            category: kpi.category().label(),
            thresholds: rule.thresholds,
            lower_is_better: rule.direction == Direction::LowerIsBetter,
        })
        .collect();
    serde_json::to_string(&rows).map_err(to_napi_error)
}
