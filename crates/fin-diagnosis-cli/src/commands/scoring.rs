use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use fin_diagnosis_core::kpi::scoring::Direction;
use fin_diagnosis_core::kpi::{score, SCORE_RULES};

/// Arguments for scoring a single value
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct ScoreArgs {
    /// Value to score
    #[arg(long)]
    pub value: Decimal,

    /// Four ascending-tier thresholds, comma separated (t1,t2,t3,t4)
    #[arg(long, value_delimiter = ',', num_args = 1..)]
    pub thresholds: Vec<Decimal>,

    /// Treat smaller values as healthier
    #[arg(long)]
    pub lower_is_better: bool,
}

pub fn run_score(args: ScoreArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let thresholds: [Decimal; 4] = args
        .thresholds
        .as_slice()
        .try_into()
        .map_err(|_| format!("--thresholds needs exactly 4 values, got {}", args.thresholds.len()))?;

    let result = score(Some(args.value), thresholds, args.lower_is_better);
    Ok(json!({
        "value": args.value.to_string(),
        "thresholds": thresholds.iter().map(|t| t.to_string()).collect::<Vec<_>>(),
        "lower_is_better": args.lower_is_better,
        "score": result,
    }))
}

pub fn run_thresholds() -> Result<Value, Box<dyn std::error::Error>> {
    let rows: Vec<Value> = SCORE_RULES
        .iter()
        .map(|(kpi, rule)| {
            let [t1, t2, t3, t4] = rule.thresholds;
            let direction = match rule.direction {
                Direction::HigherIsBetter => "higher",
                Direction::LowerIsBetter => "lower",
            };
            json!({
                "kpi": kpi.key(),
                "name": kpi.name(),
                "category": kpi.category().label(),
                "direction": direction,
                "t1": t1.to_string(),
                "t2": t2.to_string(),
                "t3": t3.to_string(),
                "t4": t4.to_string(),
            })
        })
        .collect();
    Ok(Value::Array(rows))
}
