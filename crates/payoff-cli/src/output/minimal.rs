use serde_json::Value;

use super::format_scalar;

/// Key answer fields, in priority order.
const PRIORITY_KEYS: [&str; 6] = [
    "breakeven",
    "average_price",
    "total_value",
    "matches",
    "stats",
    "title",
];

/// Print just the key answer value from the output.
///
/// Looks for well-known result fields in priority order, then falls back to
/// the first field in the result object.
pub fn print_minimal(value: &Value) {
    println!("{}", minimal_line(value));
}

fn minimal_line(value: &Value) -> String {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Value::Object(map) = result_obj {
        for key in PRIORITY_KEYS {
            match map.get(key) {
                Some(Value::Array(items)) => {
                    return items.iter().map(format_scalar).collect::<Vec<_>>().join(" ");
                }
                Some(val) if !val.is_null() => return format_scalar(val),
                _ => {}
            }
        }

        if let Some((key, val)) = map.iter().next() {
            return format!("{}: {}", key, format_scalar(val));
        }
    }

    format_scalar(result_obj)
}
