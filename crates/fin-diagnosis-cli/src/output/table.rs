use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

/// Format output as a table using the tabled crate.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            let result = map.get("result");
            match result.and_then(|r| r.get("report")) {
                Some(report) => print_report(report),
                None => print_flat_object(result.unwrap_or(value)),
            }
            if result.is_some() {
                print_envelope_notes(map);
            }
        }
        Value::Array(arr) => print_array_table(arr),
        _ => println!("{}", value),
    }
}

/// KPI rows, then category scores against the prior profile.
fn print_report(report: &Value) {
    let mut kpis = Builder::default();
    kpis.push_record(["Category", "KPI", "Current", "Prior", "Change"]);
    for kpi in report["kpis"].as_array().into_iter().flatten() {
        kpis.push_record(
            ["category", "name", "current_display", "prior_display", "delta_display"]
                .map(|k| format_value(&kpi[k])),
        );
    }
    println!("{}", Table::from(kpis));

    let card = &report["scorecard"];
    let prior = card["prior_profile"].as_array().cloned().unwrap_or_default();
    let mut scores = Builder::default();
    scores.push_record(["Category", "Score", "Prior"]);
    for (i, cat) in card["categories"].as_array().into_iter().flatten().enumerate() {
        let prior_score = prior.get(i).map(|p| format_value(&p["score"])).unwrap_or_default();
        scores.push_record([
            format_value(&cat["category"]),
            format_value(&cat["score"]),
            prior_score,
        ]);
    }
    println!("\n{}", Table::from(scores));

    println!(
        "\nOverall: {} pts ({})",
        format_value(&card["overall"]),
        format_value(&card["verdict"])
    );
}

fn print_envelope_notes(envelope: &Map<String, Value>) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_flat_object(value: &Value) {
    if let Value::Object(map) = value {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in map {
            builder.push_record([key.as_str(), &format_value(val)]);
        }
        println!("{}", Table::from(builder));
    } else {
        println!("{}", format_value(value));
    }
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(h.as_str()).map(format_value).unwrap_or_default())
                    .collect();
                builder.push_record(row);
            }
        }
        println!("{}", Table::from(builder));
    } else {
        for item in arr {
            println!("{}", format_value(item));
        }
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "-".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
