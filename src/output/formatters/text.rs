//! Default text output formatter with colors and context

use crate::output::OutputFormatter;
use crate::rule::ValidationError;
use colored::*;

/// Default human-readable formatter with colors
pub struct TextFormatter {
    use_colors: bool,
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self { use_colors: true }
    }
}

impl TextFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn without_colors() -> Self {
        Self { use_colors: false }
    }
}

impl OutputFormatter for TextFormatter {
    fn format_errors(&self, errors: &[ValidationError], file_path: &str) -> String {
        let mut output = String::new();

        for error in errors {
            let rule_name = error.rule_name.unwrap_or("unknown");

            // Format: file:line: [rule] detail
            let line = if self.use_colors {
                format!(
                    "{}:{}: {} {}",
                    file_path.blue().underline(),
                    error.line_number.to_string().cyan(),
                    format!("[{rule_name}]").yellow(),
                    error.detail
                )
            } else {
                format!("{file_path}:{}: [{rule_name}] {}", error.line_number, error.detail)
            };
            output.push_str(&line);
            output.push('\n');

            if let Some(context) = &error.context {
                let snippet = format!("    | {context}");
                if self.use_colors {
                    output.push_str(&snippet.dimmed().to_string());
                } else {
                    output.push_str(&snippet);
                }
                output.push('\n');
            }
        }

        // Remove trailing newline
        if output.ends_with('\n') {
            output.pop();
        }

        output
    }

    fn format_summary(&self, files_processed: usize, total_errors: usize) -> Option<String> {
        let files = if files_processed == 1 { "file" } else { "files" };
        let summary = if total_errors == 0 {
            let text = format!("Success: No issues found in {files_processed} {files}");
            if self.use_colors { text.green().bold().to_string() } else { text }
        } else {
            let text = format!("Found {total_errors} issue(s) in {files_processed} {files}");
            if self.use_colors { text.red().bold().to_string() } else { text }
        };
        Some(summary)
    }

    fn use_colors(&self) -> bool {
        self.use_colors
    }
}
