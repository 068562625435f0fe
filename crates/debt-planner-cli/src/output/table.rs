use std::fmt::Write;

use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{cell, is_rows, result_of};

/// Render a command result as tables using the tabled crate.
///
/// Scalar fields of the result go into a Field/Value table; each field that
/// holds rows (an array of objects) gets its own titled table. Warnings and
/// the methodology line from the envelope follow.
pub fn render_table(value: &Value) -> String {
    let mut out = String::new();
    render_value(&mut out, result_of(value));

    if let Some(envelope) = value.as_object() {
        render_footer(&mut out, envelope);
    }
    out
}

fn render_value(out: &mut String, value: &Value) {
    match value {
        Value::Object(map) => render_object(out, map),
        Value::Array(arr) if is_rows(value) => {
            let _ = writeln!(out, "{}", rows_table(arr));
        }
        Value::Array(arr) if arr.is_empty() => out.push_str("(empty)\n"),
        Value::Array(arr) => {
            for item in arr {
                let _ = writeln!(out, "{}", cell(item));
            }
        }
        _ => {
            let _ = writeln!(out, "{}", cell(value));
        }
    }
}

fn render_object(out: &mut String, map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    let mut nested = Vec::new();
    for (key, val) in map {
        if is_rows(val) {
            nested.push((key, val));
        } else {
            builder.push_record([key.as_str(), &cell(val)]);
        }
    }
    let _ = writeln!(out, "{}", Table::from(builder));

    for (key, val) in nested {
        let _ = writeln!(out, "\n{}:", key);
        if let Value::Array(rows) = val {
            render_rows(out, rows);
        }
    }
}

/// Rows that themselves carry a `schedule` array (detailed plans) print one
/// titled table per row.
fn render_rows(out: &mut String, rows: &[Value]) {
    let titled = rows.iter().all(|r| r.get("name").is_some() && r.get("schedule").is_some());
    if !titled {
        let _ = writeln!(out, "{}", rows_table(rows));
        return;
    }
    for row in rows {
        let _ = writeln!(out, "{}", cell(&row["name"]));
        render_value(out, &row["schedule"]);
    }
}

fn rows_table(rows: &[Value]) -> Table {
    let headers: Vec<String> = match rows.first() {
        Some(Value::Object(first)) => first.keys().cloned().collect(),
        _ => Vec::new(),
    };
    let mut builder = Builder::default();
    builder.push_record(headers.iter().map(String::as_str));
    for row in rows {
        builder.push_record(
            headers
                .iter()
                .map(|h| row.get(h.as_str()).map(cell).unwrap_or_default()),
        );
    }
    Table::from(builder)
}

fn render_footer(out: &mut String, envelope: &Map<String, Value>) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            out.push_str("\nWarnings:\n");
            for w in warnings.iter().filter_map(Value::as_str) {
                let _ = writeln!(out, "  - {}", w);
            }
        }
    }
    if let Some(Value::String(meth)) = envelope.get("methodology") {
        let _ = writeln!(out, "\nMethodology: {}", meth);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_object_result_with_rows() {
        let value = json!({
            "result": {
                "months_to_debt_free": 7,
                "debts": [
                    {"position": 1, "name": "A"},
                    {"position": 2, "name": "B"}
                ]
            },
            "warnings": ["Debt 'C' already paid off"],
            "methodology": "Debt snowball"
        });
        let text = render_table(&value);
        assert!(text.contains("months_to_debt_free"));
        assert!(text.contains("debts:"));
        assert!(text.contains("position"));
        assert!(text.contains("  - Debt 'C' already paid off"));
        assert!(text.ends_with("Methodology: Debt snowball\n"));
    }

    #[test]
    fn test_array_result_is_one_table() {
        let value = json!({"result": [{"period": 1, "payment": "200"}], "warnings": []});
        let text = render_table(&value);
        assert!(text.contains("period"));
        assert!(!text.contains("Warnings"));
    }

    #[test]
    fn test_empty_array() {
        assert_eq!(render_table(&json!([])), "(empty)\n");
    }
}
