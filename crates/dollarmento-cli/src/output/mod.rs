pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::{Map, Value};

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Schedule-like fields (arrays of records) inside a result object.
pub(crate) fn record_arrays(result: &Map<String, Value>) -> Vec<(&str, &[Value])> {
    result
        .iter()
        .filter_map(|(key, val)| match val {
            Value::Array(arr) if arr.first().is_some_and(Value::is_object) => {
                Some((key.as_str(), arr.as_slice()))
            }
            _ => None,
        })
        .collect()
}
