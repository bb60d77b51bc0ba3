//! Threshold scoring of KPIs into 1-5 health scores.
//!
//! Every scored KPI maps to one [`ScoreRule`] in [`SCORE_RULES`]: four
//! ascending-tier thresholds plus a direction. Each category composite is the
//! mean of its two constituent scores and the overall score is the mean of
//! the five composites, so every figure stays within `[1, 5]`.
//!
//! Growth carries one override: a move from operating loss (or zero) to
//! operating profit scores the operating-profit-growth component at 5, since
//! the growth percentage itself is undefined.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::definitions::{Category, KpiId};
use super::ratios::KpiValues;
use crate::statements::StatementPair;
use crate::types::Score;

pub const MIN_SCORE: u8 = 1;
pub const MAX_SCORE: u8 = 5;

/// Score given to a prior-period category that has no baseline to score.
pub const NEUTRAL_SCORE: Decimal = dec!(3);

const CATEGORY_COUNT: Decimal = dec!(5);

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    HigherIsBetter,
    LowerIsBetter,
}

/// Thresholds `[t1, t2, t3, t4]` for tiers 2..=5. Each threshold is a closed
/// bound: a value exactly on it earns the higher tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRule {
    pub thresholds: [Decimal; 4],
    pub direction: Direction,
}

impl ScoreRule {
    pub const fn higher(t1: Decimal, t2: Decimal, t3: Decimal, t4: Decimal) -> Self {
        Self {
            thresholds: [t1, t2, t3, t4],
            direction: Direction::HigherIsBetter,
        }
    }

    pub const fn lower(t1: Decimal, t2: Decimal, t3: Decimal, t4: Decimal) -> Self {
        Self {
            thresholds: [t1, t2, t3, t4],
            direction: Direction::LowerIsBetter,
        }
    }

    pub fn score(&self, value: Option<Decimal>) -> u8 {
        score(
            value,
            self.thresholds,
            self.direction == Direction::LowerIsBetter,
        )
    }
}

/// The scoring table. KPIs not listed here are displayed but not scored.
pub const SCORE_RULES: [(KpiId, ScoreRule); 10] = [
    (
        KpiId::OperatingMargin,
        ScoreRule::higher(dec!(0), dec!(2), dec!(5), dec!(10)),
    ),
    (
        KpiId::FreeCashFlow,
        ScoreRule::higher(dec!(-1000), dec!(0), dec!(1000), dec!(5000)),
    ),
    (
        KpiId::SalesGrowth,
        ScoreRule::higher(dec!(0), dec!(3), dec!(5), dec!(10)),
    ),
    (
        KpiId::OpProfitGrowth,
        ScoreRule::higher(dec!(0), dec!(3), dec!(5), dec!(10)),
    ),
    (
        KpiId::FixedAssetTurnover,
        ScoreRule::higher(dec!(1), dec!(3), dec!(5), dec!(10)),
    ),
    (
        KpiId::InventoryDays,
        ScoreRule::lower(dec!(180), dec!(90), dec!(60), dec!(30)),
    ),
    (
        KpiId::SalesPerEmployee,
        ScoreRule::higher(dec!(10000), dec!(15000), dec!(20000), dec!(30000)),
    ),
    (
        KpiId::OpProfitPerEmployee,
        ScoreRule::higher(dec!(0), dec!(500), dec!(1000), dec!(2000)),
    ),
    (
        KpiId::EquityRatio,
        ScoreRule::higher(dec!(10), dec!(20), dec!(40), dec!(60)),
    ),
    (
        KpiId::LoanToMonthlySales,
        ScoreRule::lower(dec!(12), dec!(6), dec!(3), dec!(1)),
    ),
];

/// The two scored KPIs behind each radar axis.
pub const CATEGORY_COMPONENTS: [(Category, [KpiId; 2]); 5] = [
    (
        Category::Profitability,
        [KpiId::OperatingMargin, KpiId::FreeCashFlow],
    ),
    (Category::Growth, [KpiId::SalesGrowth, KpiId::OpProfitGrowth]),
    (
        Category::Efficiency,
        [KpiId::FixedAssetTurnover, KpiId::InventoryDays],
    ),
    (
        Category::Productivity,
        [KpiId::SalesPerEmployee, KpiId::OpProfitPerEmployee],
    ),
    (Category::Safety, [KpiId::EquityRatio, KpiId::LoanToMonthlySales]),
];

pub fn rule_for(id: KpiId) -> Option<&'static ScoreRule> {
    SCORE_RULES
        .iter()
        .find(|(kpi, _)| *kpi == id)
        .map(|(_, rule)| rule)
}

/// Map a value onto the 1-5 scale.
///
/// An undefined value (growth from a non-positive base) scores 1.
pub fn score(value: Option<Decimal>, thresholds: [Decimal; 4], lower_is_better: bool) -> u8 {
    let Some(v) = value else {
        return MIN_SCORE;
    };
    let [t1, t2, t3, t4] = thresholds;
    let passes = |t: Decimal| if lower_is_better { v <= t } else { v >= t };

    if passes(t4) {
        5
    } else if passes(t3) {
        4
    } else if passes(t2) {
        3
    } else if passes(t1) {
        2
    } else {
        1
    }
}

// ---------------------------------------------------------------------------
// Composites
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentScore {
    pub kpi: KpiId,
    pub value: Option<Decimal>,
    pub score: u8,
    /// Set when the loss-to-profit turnaround rule replaced the raw score.
    pub turnaround_override: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub category: Category,
    /// Unrounded mean of the component scores
    pub score: Score,
    pub components: Vec<ComponentScore>,
}

/// One point of the prior-period radar profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfilePoint {
    pub category: Category,
    pub score: Score,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthVerdict {
    Robust,
    Standard,
    NeedsImprovement,
}

impl HealthVerdict {
    pub fn from_overall(overall: Score) -> Self {
        if overall >= dec!(4) {
            Self::Robust
        } else if overall >= dec!(3) {
            Self::Standard
        } else {
            Self::NeedsImprovement
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::Robust => {
                "Very healthy. The business has the strength to invest offensively."
            }
            Self::Standard => "Standard condition. Shore up the weak categories.",
            Self::NeedsImprovement => {
                "Improvement is urgent. Prioritise securing financial safety."
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scorecard {
    /// Current-period composites in radar order
    pub categories: Vec<CategoryScore>,
    /// Mean of the five composites, in `[1, 5]`
    pub overall: Score,
    pub verdict: HealthVerdict,
    /// Prior-period composites for the comparison radar
    pub prior_profile: Vec<ProfilePoint>,
}

impl Scorecard {
    pub fn category(&self, category: Category) -> Option<&CategoryScore> {
        self.categories.iter().find(|c| c.category == category)
    }
}

/// Score the current period, build the prior profile and the verdict.
pub fn score_kpis(values: &KpiValues, pair: &StatementPair) -> Scorecard {
    let turnaround =
        pair.prior.op_profit <= Decimal::ZERO && pair.current.op_profit > Decimal::ZERO;

    let categories: Vec<CategoryScore> = CATEGORY_COMPONENTS
        .iter()
        .map(|(category, kpis)| {
            let components: Vec<ComponentScore> = kpis
                .iter()
                .map(|kpi| {
                    let value = values.current(*kpi);
                    let raw = rule_for(*kpi).map_or(MIN_SCORE, |r| r.score(value));
                    if *kpi == KpiId::OpProfitGrowth && turnaround {
                        ComponentScore {
                            kpi: *kpi,
                            value,
                            score: MAX_SCORE,
                            turnaround_override: true,
                        }
                    } else {
                        ComponentScore {
                            kpi: *kpi,
                            value,
                            score: raw,
                            turnaround_override: false,
                        }
                    }
                })
                .collect();
            CategoryScore {
                category: *category,
                score: mean(components.iter().map(|c| c.score)),
                components,
            }
        })
        .collect();

    let overall = categories.iter().map(|c| c.score).sum::<Decimal>() / CATEGORY_COUNT;

    Scorecard {
        prior_profile: prior_profile(values),
        verdict: HealthVerdict::from_overall(overall),
        overall,
        categories,
    }
}

/// Prior-period composites from the constituents that have a prior value.
/// A category without any prior baseline gets the neutral score.
///
/// Efficiency, productivity and safety are scored from their prior figures.
/// The earlier spreadsheet tool scored only prior profitability (operating
/// margin alone) and drew every other axis at a flat 3, so its radar data
/// is not comparable with this profile.
fn prior_profile(values: &KpiValues) -> Vec<ProfilePoint> {
    CATEGORY_COMPONENTS
        .iter()
        .map(|(category, kpis)| {
            let scores: Vec<u8> = kpis
                .iter()
                .filter_map(|kpi| {
                    let value = values.prior(*kpi)?;
                    rule_for(*kpi).map(|r| r.score(Some(value)))
                })
                .collect();
            let score = if scores.is_empty() {
                NEUTRAL_SCORE
            } else {
                mean(scores.into_iter())
            };
            ProfilePoint {
                category: *category,
                score,
            }
        })
        .collect()
}

fn mean(scores: impl Iterator<Item = u8>) -> Score {
    let (sum, n) = scores.fold((0u32, 0u32), |(s, n), x| (s + u32::from(x), n + 1));
    if n == 0 {
        return Decimal::from(MIN_SCORE);
    }
    Decimal::from(sum) / Decimal::from(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statements::RawLineItems;

    const MARGIN: [Decimal; 4] = [dec!(0), dec!(2), dec!(5), dec!(10)];
    const INVENTORY: [Decimal; 4] = [dec!(180), dec!(90), dec!(60), dec!(30)];

    #[test]
    fn test_score_boundaries_higher_is_better() {
        assert_eq!(score(Some(dec!(10)), MARGIN, false), 5);
        assert_eq!(score(Some(dec!(9.99)), MARGIN, false), 4);
        assert_eq!(score(Some(dec!(5)), MARGIN, false), 4);
        assert_eq!(score(Some(dec!(2)), MARGIN, false), 3);
        assert_eq!(score(Some(dec!(0)), MARGIN, false), 2);
        assert_eq!(score(Some(dec!(-0.1)), MARGIN, false), 1);
    }

    #[test]
    fn test_score_boundaries_lower_is_better() {
        assert_eq!(score(Some(dec!(30)), INVENTORY, true), 5);
        assert_eq!(score(Some(dec!(30.1)), INVENTORY, true), 4);
        assert_eq!(score(Some(dec!(60)), INVENTORY, true), 4);
        assert_eq!(score(Some(dec!(90)), INVENTORY, true), 3);
        assert_eq!(score(Some(dec!(180)), INVENTORY, true), 2);
        assert_eq!(score(Some(dec!(181)), INVENTORY, true), 1);
    }

    #[test]
    fn test_undefined_value_scores_minimum() {
        assert_eq!(score(None, MARGIN, false), 1);
        assert_eq!(score(None, INVENTORY, true), 1);
    }

    #[test]
    fn test_score_monotonic() {
        let mut prev_hi = 0;
        let mut prev_lo = 6;
        for i in -20..=220 {
            let v = Some(Decimal::from(i));
            let hi = score(v, MARGIN, false);
            let lo = score(v, INVENTORY, true);
            assert!(hi >= prev_hi);
            assert!(lo <= prev_lo);
            prev_hi = hi;
            prev_lo = lo;
        }
    }

    #[test]
    fn test_every_component_has_a_rule() {
        for (_, kpis) in CATEGORY_COMPONENTS {
            for kpi in kpis {
                assert!(rule_for(kpi).is_some(), "{kpi} has no score rule");
            }
        }
        assert!(rule_for(KpiId::WorkingCapital).is_none());
        assert!(rule_for(KpiId::CurrentRatio).is_none());
        assert!(rule_for(KpiId::DebtRepaymentYears).is_none());
    }

    #[test]
    fn test_sample_scorecard() {
        let pair = StatementPair::sample();
        let card = score_kpis(&KpiValues::compute(&pair), &pair);
        // margin 5% -> 4, fcf 3000 -> 4
        assert_eq!(card.category(Category::Profitability).unwrap().score, dec!(4));
        // sales +11.1% -> 5, op profit +66.7% -> 5
        assert_eq!(card.category(Category::Growth).unwrap().score, dec!(5));
        // turnover 5.0 -> 4, inventory 26 days -> 5
        assert_eq!(card.category(Category::Efficiency).unwrap().score, dec!(4.5));
        // 10000 per head -> 2, 500 per head -> 3
        assert_eq!(card.category(Category::Productivity).unwrap().score, dec!(2.5));
        // equity 24.5% -> 3, loans 3.6x monthly sales -> 3
        assert_eq!(card.category(Category::Safety).unwrap().score, dec!(3));
        // (4 + 5 + 4.5 + 2.5 + 3) / 5
        assert_eq!(card.overall, dec!(3.8));
        assert_eq!(card.verdict, HealthVerdict::Standard);
    }

    #[test]
    fn test_turnaround_override() {
        let pair = StatementPair::from_raw(
            RawLineItems {
                sales: dec!(1_000),
                sga: dec!(950),
                ..Default::default()
            },
            RawLineItems {
                sales: dec!(1_000),
                sga: dec!(1_100),
                ..Default::default()
            },
        );
        assert_eq!(pair.prior.op_profit, dec!(-100));
        assert_eq!(pair.current.op_profit, dec!(50));
        let card = score_kpis(&KpiValues::compute(&pair), &pair);
        let growth = card.category(Category::Growth).unwrap();
        let op = &growth.components[1];
        assert_eq!(op.kpi, KpiId::OpProfitGrowth);
        assert_eq!(op.value, None);
        assert_eq!(op.score, 5);
        assert!(op.turnaround_override);
        // sales flat (0%) -> 2
        assert_eq!(growth.score, dec!(3.5));
    }

    #[test]
    fn test_no_override_when_loss_persists() {
        let pair = StatementPair::from_raw(
            RawLineItems {
                sales: dec!(1_000),
                sga: dec!(1_050),
                ..Default::default()
            },
            RawLineItems {
                sales: dec!(1_000),
                sga: dec!(1_100),
                ..Default::default()
            },
        );
        let card = score_kpis(&KpiValues::compute(&pair), &pair);
        let op = &card.category(Category::Growth).unwrap().components[1];
        assert_eq!(op.score, 1);
        assert!(!op.turnaround_override);
    }

    #[test]
    fn test_sample_prior_profile() {
        let pair = StatementPair::sample();
        let card = score_kpis(&KpiValues::compute(&pair), &pair);
        let profile: Vec<(Category, Decimal)> = card
            .prior_profile
            .iter()
            .map(|p| (p.category, p.score))
            .collect();
        assert_eq!(
            profile,
            vec![
                // prior margin 3.33% -> 3 (fcf has no prior)
                (Category::Profitability, dec!(3)),
                (Category::Growth, NEUTRAL_SCORE),
                // turnover 4.5 -> 3, inventory 23.2 days -> 5
                (Category::Efficiency, dec!(4)),
                // 10000 per head -> 2, 333 per head -> 2
                (Category::Productivity, dec!(2)),
                // equity 22.2% -> 3, loans 4.27x -> 3
                (Category::Safety, dec!(3)),
            ]
        );
    }

    #[test]
    fn test_all_zero_input_stays_in_range() {
        let pair = StatementPair::from_raw(RawLineItems::default(), RawLineItems::default());
        let card = score_kpis(&KpiValues::compute(&pair), &pair);
        assert!(card.overall >= dec!(1) && card.overall <= dec!(5));
        assert_eq!(card.verdict, HealthVerdict::NeedsImprovement);
    }

    #[test]
    fn test_verdict_thresholds() {
        assert_eq!(HealthVerdict::from_overall(dec!(4)), HealthVerdict::Robust);
        assert_eq!(HealthVerdict::from_overall(dec!(3.9)), HealthVerdict::Standard);
        assert_eq!(HealthVerdict::from_overall(dec!(3)), HealthVerdict::Standard);
        assert_eq!(
            HealthVerdict::from_overall(dec!(2.9)),
            HealthVerdict::NeedsImprovement
        );
    }
}
