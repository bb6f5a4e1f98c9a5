use realty_calc_core::format::{format_currency, format_percent, NegativeStyle};
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

/// Format output as a table using the tabled crate.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            // Check if "result" key holds the primary data
            if let Some(result) = map.get("result") {
                print_result_table(result, map);
            } else {
                print_flat_object(map);
            }
        }
        Value::Array(arr) => {
            print_array_table(arr);
        }
        _ => {
            println!("{}", value);
        }
    }
}

fn print_result_table(result: &Value, envelope: &Map<String, Value>) {
    match result {
        Value::Object(res_map) => print_flat_object(res_map),
        Value::Array(rows) => print_array_table(rows),
        other => println!("{}", format_value("", other)),
    }

    for extra in ["schedule_totals", "edits"] {
        match envelope.get(extra) {
            Some(Value::Object(map)) => {
                println!();
                print_flat_object(map);
            }
            Some(Value::Array(rows)) if !rows.is_empty() => {
                println!();
                print_array_table(rows);
            }
            _ => {}
        }
    }

    // Print warnings if any
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

    // Print methodology
    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

/// Field/value table; nested objects are flattened to dotted keys and long
/// arrays are summarised by their length.
fn print_flat_object(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    push_fields(&mut builder, "", map);
    println!("{}", Table::from(builder));
}

fn push_fields(builder: &mut Builder, prefix: &str, map: &Map<String, Value>) {
    for (key, val) in map {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match val {
            Value::Object(inner) if !is_scenario_band(inner) => push_fields(builder, &path, inner),
            Value::Array(items) if items.iter().any(Value::is_object) => {
                builder.push_record([path, format!("[{} rows]", items.len())]);
            }
            _ => {
                let text = format_value(key, val);
                builder.push_record([path, text]);
            }
        }
    }
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    // Collect all keys from first object for headers
    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| {
                        map.get(h.as_str())
                            .map(|v| format_value(h, v))
                            .unwrap_or_default()
                    })
                    .collect();
                builder.push_record(row);
            }
        }

        let table = Table::from(builder);
        println!("{}", table);
    } else {
        // Simple array of values
        for item in arr {
            println!("{}", format_value("", item));
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldKind {
    Currency,
    Percent,
    Ratio,
    Plain,
}

/// Decide how a field renders from its name.
fn field_kind(key: &str) -> FieldKind {
    const PLAIN: [&str; 9] = [
        "payment_number",
        "year",
        "month",
        "months",
        "payments_per_year",
        "total_payments",
        "actual_payment_count",
        "adjustment_pct",
        "label",
    ];
    if PLAIN.contains(&key)
        || key.starts_with("days")
        || key.ends_with("_year")
        || key.ends_with("_years")
    {
        return FieldKind::Plain;
    }
    if key == "debt_service_coverage" {
        return FieldKind::Ratio;
    }
    if key.contains("rate")
        || key.contains("ratio")
        || key.contains("loan_to_value")
        || key == "cash_on_cash"
    {
        return FieldKind::Percent;
    }
    FieldKind::Currency
}

/// `{min, max, avg}` scenario triple.
fn is_scenario_band(map: &Map<String, Value>) -> bool {
    map.len() == 3 && ["min", "max", "avg"].iter().all(|k| map.contains_key(*k))
}

fn format_decimal(kind: FieldKind, raw: &str) -> String {
    match (kind, raw.parse::<Decimal>()) {
        (FieldKind::Currency, Ok(d)) => format_currency(d, NegativeStyle::LeadingMinus),
        (FieldKind::Percent, Ok(d)) => format_percent(d),
        (FieldKind::Ratio, Ok(d)) => format!("{:.2}x", d.round_dp(2)),
        _ => raw.to_string(),
    }
}

fn format_value(key: &str, value: &Value) -> String {
    let kind = field_kind(key);
    match value {
        Value::String(s) => format_decimal(kind, s),
        Value::Number(n) => format_decimal(kind, &n.to_string()),
        Value::Bool(b) => b.to_string(),
        Value::Null => "N/A".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(|v| format_value(key, v)).collect();
            items.join(", ")
        }
        Value::Object(map) if is_scenario_band(map) => {
            let column = |k: &str| map.get(k).map(|v| format_value(key, v)).unwrap_or_default();
            format!("{} / {} / {}", column("min"), column("max"), column("avg"))
        }
        Value::Object(map) if map.contains_key("monthly") && map.contains_key("cumulative") => {
            let part = |k: &str| map.get(k).map(|v| format_value(key, v)).unwrap_or_default();
            format!("{} (cum. {})", part("monthly"), part("cumulative"))
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
