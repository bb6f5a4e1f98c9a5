use serde_json::Value;

/// Print just the key answer value from the output.
///
/// Heuristic: look for well-known result fields in order of priority,
/// then fall back to the first field in the result object. Row arrays
/// report on their last row.
pub fn print_minimal(value: &Value) {
    // Try to extract the "result" envelope
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let target = match result_obj {
        Value::Array(rows) => match rows.last() {
            Some(last) => last,
            None => {
                println!("0 rows");
                return;
            }
        },
        other => other,
    };

    // Priority list of key output fields, as JSON pointers
    let priority_keys = [
        "/actual_payment_count",
        "/loan/payment_per_period",
        "/summary/loan/payment_per_period",
        "/remaining_balance",
        "/ending_balance",
        "/cash_flow/cumulative/avg",
        "/cumulative_cash_flow/avg",
        "/corrected_total",
    ];

    if let Value::Object(map) = target {
        // Try priority keys first (skip null values)
        for key in &priority_keys {
            if let Some(val) = target.pointer(key) {
                if !val.is_null() {
                    println!("{}", format_minimal(val));
                    return;
                }
            }
        }

        // Fall back to first field
        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_minimal(val));
            return;
        }
    }

    // Not an object, just print directly
    println!("{}", format_minimal(target));
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
