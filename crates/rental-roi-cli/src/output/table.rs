use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

/// Format output as tables using the tabled crate.
pub fn print_table(value: &Value) {
    print!("{}", render(value));
}

/// Scalar fields go in a Field/Value table with nested objects flattened to
/// dotted keys. Arrays of objects (projections, schedules, alternatives)
/// get a table of their own.
pub(crate) fn render(value: &Value) -> String {
    let mut out = String::new();
    match value {
        Value::Object(map) => match map.get("result") {
            Some(result) => {
                render_section(&mut out, None, result);
                render_envelope_notes(&mut out, map);
            }
            None => render_section(&mut out, None, value),
        },
        Value::Array(arr) => render_array(&mut out, None, arr),
        other => out.push_str(&format!("{}\n", format_value(other))),
    }
    out
}

fn render_section(out: &mut String, title: Option<&str>, value: &Value) {
    match value {
        Value::Object(map) => {
            let mut fields = Vec::new();
            let mut nested_tables = Vec::new();
            flatten(None, map, &mut fields, &mut nested_tables);

            if !fields.is_empty() {
                if let Some(title) = title {
                    out.push_str(&format!("\n{title}:\n"));
                }
                let mut builder = Builder::default();
                builder.push_record(["Field", "Value"]);
                for (key, val) in fields {
                    builder.push_record([key, val]);
                }
                out.push_str(&format!("{}\n", Table::from(builder)));
            }
            for (key, rows) in nested_tables {
                render_array(out, Some(key.as_str()), rows);
            }
        }
        Value::Array(arr) => render_array(out, title, arr),
        other => out.push_str(&format!("{}\n", format_value(other))),
    }
}

fn flatten<'a>(
    prefix: Option<&str>,
    map: &'a Map<String, Value>,
    fields: &mut Vec<(String, String)>,
    nested_tables: &mut Vec<(String, &'a [Value])>,
) {
    for (key, val) in map {
        let name = match prefix {
            Some(p) => format!("{p}.{key}"),
            None => key.clone(),
        };
        match val {
            Value::Object(inner) => flatten(Some(&name), inner, fields, nested_tables),
            Value::Array(rows) if rows.first().is_some_and(Value::is_object) => {
                nested_tables.push((name, rows.as_slice()));
            }
            _ => fields.push((name, format_value(val))),
        }
    }
}

fn render_array(out: &mut String, title: Option<&str>, arr: &[Value]) {
    if let Some(title) = title {
        out.push_str(&format!("\n{title}:\n"));
    }
    if arr.is_empty() {
        out.push_str("(empty)\n");
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(headers.clone());

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(h.as_str()).map(format_value).unwrap_or_default())
                    .collect();
                builder.push_record(row);
            }
        }
        out.push_str(&format!("{}\n", Table::from(builder)));
    } else {
        for item in arr {
            out.push_str(&format!("{}\n", format_value(item)));
        }
    }
}

fn render_envelope_notes(out: &mut String, envelope: &Map<String, Value>) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            out.push_str("\nWarnings:\n");
            for w in warnings.iter().filter_map(Value::as_str) {
                out.push_str(&format!("  - {w}\n"));
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        out.push_str(&format!("\nMethodology: {meth}\n"));
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "n/a".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join("; ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
