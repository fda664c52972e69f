use serde_json::Value;

/// Headline figure per command, most specific first.
const PRIORITY_KEYS: [&str; 8] = [
    "should_buy",
    "monthly_payment",
    "roi_10_year",
    "net_rental_yield",
    "monthly_cash_flow",
    "decision",
    "roi",
    "name",
];

/// Print just the key answer from the output.
pub fn print_minimal(value: &Value) {
    println!("{}", minimal_line(value));
}

pub(crate) fn minimal_line(value: &Value) -> String {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    // Analysis envelopes nest the answer one level down
    let target = match result_obj.get("recommendation") {
        Some(rec) if rec.is_object() => rec,
        _ => result_obj,
    };

    match target {
        Value::Object(map) => {
            for key in PRIORITY_KEYS {
                if let Some(val) = map.get(key).filter(|v| !v.is_null()) {
                    return format_minimal(val);
                }
            }
            match map.iter().next() {
                Some((key, val)) => format!("{}: {}", key, format_minimal(val)),
                None => String::new(),
            }
        }
        // Comparison tables: the first row is the property itself
        Value::Array(rows) => rows.first().map(minimal_line).unwrap_or_default(),
        other => format_minimal(other),
    }
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
