use serde_json::{Map, Value};
use std::io::{self, Write};

/// Write output as CSV to stdout.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let _ = write_csv(stdout.lock(), value);
}

/// A result holding a row set (projections, schedule, comparison rows) is
/// written as that table; anything else as field/value pairs.
pub(crate) fn write_csv<W: Write>(writer: W, value: &Value) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match result {
        Value::Array(rows) => write_rows(&mut wtr, rows)?,
        Value::Object(map) => match primary_rows(map) {
            Some(rows) => write_rows(&mut wtr, rows)?,
            None => {
                wtr.write_record(["field", "value"])?;
                write_fields(&mut wtr, None, map)?;
            }
        },
        other => wtr.write_record([format_csv_value(other)])?,
    }

    wtr.flush()?;
    Ok(())
}

fn primary_rows(map: &Map<String, Value>) -> Option<&[Value]> {
    ["projections", "schedule"]
        .iter()
        .find_map(|key| match map.get(*key) {
            Some(Value::Array(rows)) if !rows.is_empty() => Some(rows.as_slice()),
            _ => None,
        })
}

fn write_fields<W: Write>(
    wtr: &mut csv::Writer<W>,
    prefix: Option<&str>,
    map: &Map<String, Value>,
) -> csv::Result<()> {
    for (key, val) in map {
        let name = match prefix {
            Some(p) => format!("{p}.{key}"),
            None => key.clone(),
        };
        match val {
            Value::Object(inner) => write_fields(wtr, Some(&name), inner)?,
            _ => wtr.write_record([name.as_str(), &format_csv_value(val)])?,
        }
    }
    Ok(())
}

fn write_rows<W: Write>(wtr: &mut csv::Writer<W>, rows: &[Value]) -> csv::Result<()> {
    let Some(Value::Object(first)) = rows.first() else {
        for item in rows {
            wtr.write_record([format_csv_value(item)])?;
        }
        return Ok(());
    };

    let headers: Vec<&str> = first.keys().map(String::as_str).collect();
    wtr.write_record(&headers)?;
    for item in rows {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(*h).map(format_csv_value).unwrap_or_default())
                .collect();
            wtr.write_record(&row)?;
        }
    }
    Ok(())
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
