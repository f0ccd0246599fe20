pub mod csv_out;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::{Map, Value};

/// Fields of a result object holding per-row data (curves, holdings,
/// reference lines). Formatters render these as their own rows instead of
/// flattening them into a single cell.
pub const SERIES_FIELDS: [&str; 4] = ["points", "curve", "holdings", "reference_lines"];

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => match serde_json::to_string_pretty(value) {
            Ok(s) => println!("{}", s),
            Err(e) => eprintln!("JSON serialization error: {}", e),
        },
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// The first series field present in a result object, if any.
pub fn first_series(result: &Map<String, Value>) -> Option<(&'static str, &Vec<Value>)> {
    SERIES_FIELDS.iter().find_map(|name| match result.get(*name) {
        Some(Value::Array(rows)) if rows.iter().all(Value::is_object) => Some((*name, rows)),
        _ => None,
    })
}

/// Render a scalar JSON value as plain text.
pub fn format_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
