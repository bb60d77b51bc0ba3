//! KPI derivation, scoring and display formatting.

pub mod definitions;
pub mod format;
pub mod ratios;
pub mod scoring;

pub use definitions::{Category, KpiDefinition, KpiId, Unit};
pub use ratios::{KpiValues, PeriodRatios};
pub use scoring::{score, HealthVerdict, ScoreRule, Scorecard, SCORE_RULES};
