use serde_json::Value;

/// Pretty JSON on a terminal, one compact line when stdout is piped.
pub fn print_json(value: &Value) {
    match render_json(value, atty::is(atty::Stream::Stdout)) {
        Ok(text) => println!("{text}"),
        Err(e) => {
            tracing::warn!(error = %e, "result could not be serialized");
            eprintln!("JSON serialization error: {e}");
        }
    }
}

fn render_json(value: &Value, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_piped_output_is_one_line() {
        let envelope = json!({"result": {"actual_payment_count": 360}, "warnings": []});
        let compact = render_json(&envelope, false).unwrap();
        assert!(!compact.contains('\n'));
        assert!(render_json(&envelope, true).unwrap().contains('\n'));
    }
}
