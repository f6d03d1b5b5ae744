use futures::FutureExt;
use futures::future::{self, BoxFuture};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use super::executor::{self, ExecutorError};
use super::{ParseOptions, ParserBackend, RawFailure};
use crate::diagnostics::{ParsedDiagnostic, structured};

pub const DEFAULT_KATEX_COMMAND: &str = "katex-parse";

/// JSON a failing KaTeX tool prints on stdout
#[derive(Debug, Deserialize)]
struct StructuredError {
    message: String,
    #[serde(default)]
    position: Option<usize>,
}

/// Structured backend running a KaTeX parse tool synchronously.
///
/// `parse` does all of its work before returning, so the future it hands back
/// is already complete.
#[derive(Debug, Clone)]
pub struct KatexBackend {
    command: Vec<String>,
    program: Arc<OnceLock<Result<PathBuf, ExecutorError>>>,
}

impl KatexBackend {
    pub fn new(command: Vec<String>) -> Self {
        let command = if command.is_empty() {
            vec![DEFAULT_KATEX_COMMAND.to_string()]
        } else {
            command
        };
        Self {
            command,
            program: Arc::new(OnceLock::new()),
        }
    }

    pub fn command(&self) -> &[String] {
        &self.command
    }

    fn args(&self, options: ParseOptions) -> Vec<String> {
        let mut args = self.command.get(1..).unwrap_or_default().to_vec();
        if options.display_mode {
            args.push("--display-mode".to_string());
        }
        if options.strict {
            args.push("--strict".to_string());
        }
        args
    }

    fn parse_blocking(&self, code: &str, options: ParseOptions) -> Result<(), RawFailure> {
        let program = self
            .program
            .get_or_init(|| executor::resolve_tool(self.command.first().map(String::as_str).unwrap_or_default()))
            .clone()?;

        let output = executor::run_blocking(&program, &self.args(options), code)?;
        if output.success {
            return Ok(());
        }

        let report = if output.stdout.trim().is_empty() {
            output.stderr.trim()
        } else {
            output.stdout.trim()
        };
        Err(parse_failure_report(report).unwrap_or_else(|| RawFailure::message(output.failure_text())))
    }
}

/// Read the tool's JSON failure report, if it printed one.
fn parse_failure_report(report: &str) -> Option<RawFailure> {
    let parsed: StructuredError = serde_json::from_str(report).ok()?;
    Some(RawFailure {
        raw_message: parsed.message,
        position: parsed.position,
    })
}

impl Default for KatexBackend {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl ParserBackend for KatexBackend {
    fn name(&self) -> &'static str {
        "katex"
    }

    fn parse<'a>(&'a self, code: &'a str, options: ParseOptions) -> BoxFuture<'a, Result<(), RawFailure>> {
        future::ready(self.parse_blocking(code, options)).boxed()
    }

    fn translate(&self, failure: &RawFailure, code: &str) -> ParsedDiagnostic {
        structured::translate(failure, code)
    }
}
