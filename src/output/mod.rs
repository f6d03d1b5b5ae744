//! Output formatting for validation results
//!
//! Two formats are supported: colored human-readable text and JSON.

use crate::rule::ValidationError;
use std::io::{self, Write};
use std::str::FromStr;

pub mod formatters;

pub use formatters::*;

/// Trait for output formatters
pub trait OutputFormatter {
    /// Format the diagnostics of one file
    fn format_errors(&self, errors: &[ValidationError], file_path: &str) -> String;

    /// Format the diagnostics of a whole run, one `(path, diagnostics)` pair per file
    fn format_report(&self, results: &[(String, Vec<ValidationError>)]) -> String {
        results
            .iter()
            .filter(|(_, errors)| !errors.is_empty())
            .map(|(file_path, errors)| self.format_errors(errors, file_path))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Format a summary of results across multiple files
    fn format_summary(&self, _files_processed: usize, _total_errors: usize) -> Option<String> {
        None
    }

    /// Whether this formatter should use colors
    fn use_colors(&self) -> bool {
        false
    }
}

/// Available output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable format with colors and context
    #[default]
    Text,
    /// JSON array of every diagnostic
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "full" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: {s}")),
        }
    }
}

impl OutputFormat {
    /// Create a formatter instance for this format
    pub fn create_formatter(&self) -> Box<dyn OutputFormatter> {
        match self {
            OutputFormat::Text => Box::new(TextFormatter::new()),
            OutputFormat::Json => Box::new(JsonFormatter::new()),
        }
    }
}

/// Output writer that handles stdout/stderr routing
pub struct OutputWriter {
    quiet: bool,
}

impl OutputWriter {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    /// Write a line of results to stdout
    pub fn writeln(&self, content: &str) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{content}")?;
        stdout.flush()
    }

    /// Write a status or summary line to stdout unless quiet
    pub fn write_status(&self, content: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.writeln(content)
    }
}
