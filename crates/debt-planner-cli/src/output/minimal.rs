use serde_json::Value;

use super::{cell, result_of};

/// Headline fields, most telling first.
const PRIORITY_KEYS: [&str; 5] = [
    "months_to_debt_free",
    "payoff_date",
    "total_paid",
    "first_month_payment",
    "path",
];

/// Just the key answer from a command's output.
///
/// Row results print their row count; objects print the first non-null
/// priority field, falling back to the first field.
pub fn minimal_text(value: &Value) -> String {
    let result = result_of(value);

    match result {
        Value::Array(arr) => arr.len().to_string(),
        Value::Object(map) => PRIORITY_KEYS
            .iter()
            .find_map(|key| map.get(*key).filter(|v| !v.is_null()).map(cell))
            .or_else(|| {
                map.iter()
                    .next()
                    .map(|(key, val)| format!("{}: {}", key, cell(val)))
            })
            .unwrap_or_default(),
        _ => cell(result),
    }
}
