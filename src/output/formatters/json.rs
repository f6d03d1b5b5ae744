//! JSON output formatter

use crate::output::OutputFormatter;
use crate::rule::ValidationError;
use serde_json::{Value, json};

/// JSON formatter for machine-readable output
#[derive(Default)]
pub struct JsonFormatter;

impl JsonFormatter {
    pub fn new() -> Self {
        Self
    }
}

fn error_to_json(error: &ValidationError, file_path: &str) -> Value {
    json!({
        "file": file_path,
        "line": error.line_number,
        "rule": error.rule_name.unwrap_or("unknown"),
        "kind": error.kind,
        "detail": error.detail,
        "context": error.context,
    })
}

impl OutputFormatter for JsonFormatter {
    fn format_errors(&self, errors: &[ValidationError], file_path: &str) -> String {
        let json_errors: Vec<Value> = errors.iter().map(|error| error_to_json(error, file_path)).collect();
        serde_json::to_string_pretty(&json_errors).unwrap_or_default()
    }

    fn format_report(&self, results: &[(String, Vec<ValidationError>)]) -> String {
        format_all_errors_as_json(results)
    }
}

/// Format the diagnostics of every file as a single JSON document
pub fn format_all_errors_as_json(all_errors: &[(String, Vec<ValidationError>)]) -> String {
    let json_errors: Vec<Value> = all_errors
        .iter()
        .flat_map(|(file_path, errors)| errors.iter().map(move |error| error_to_json(error, file_path)))
        .collect();
    serde_json::to_string_pretty(&json_errors).unwrap_or_default()
}
