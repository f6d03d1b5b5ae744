use futures::FutureExt;
use futures::future::BoxFuture;
use std::path::PathBuf;
use std::sync::Arc;

use super::executor::{self, ExecutorError};
use super::setup::SharedSetup;
use super::{ParseOptions, ParserBackend, RawFailure};
use crate::diagnostics::{ParsedDiagnostic, free_text};

pub const DEFAULT_MERMAID_COMMAND: &str = "mermaid-parse";

/// A resolved and probed Mermaid tool.
#[derive(Debug, Clone)]
pub struct PreparedTool {
    pub program: PathBuf,
    pub args: Vec<String>,
}

/// Free-text backend running a Mermaid parse tool asynchronously.
///
/// The tool is resolved and probed with `--version` on first use. That setup is
/// shared by every clone of the backend and by every fragment validated
/// concurrently through it.
#[derive(Debug, Clone)]
pub struct MermaidBackend {
    command: Vec<String>,
    setup: Arc<SharedSetup<PreparedTool>>,
}

impl MermaidBackend {
    pub fn new(command: Vec<String>) -> Self {
        let command = if command.is_empty() {
            vec![DEFAULT_MERMAID_COMMAND.to_string()]
        } else {
            command
        };
        Self {
            command,
            setup: Arc::new(SharedSetup::new()),
        }
    }

    pub fn command(&self) -> &[String] {
        &self.command
    }

    async fn prepare(command: &[String]) -> Result<PreparedTool, ExecutorError> {
        let tool = command.first().map(String::as_str).unwrap_or_default();
        let program = executor::resolve_tool(tool)?;
        let args = command.get(1..).unwrap_or_default().to_vec();

        let probe = executor::run_async(&program, &["--version".to_string()], "").await?;
        if !probe.success {
            return Err(ExecutorError::ExecutionFailed {
                tool: tool.to_string(),
                message: probe.failure_text(),
            });
        }
        log::debug!("Using {} ({})", program.display(), probe.stdout.trim());

        Ok(PreparedTool { program, args })
    }
}

impl Default for MermaidBackend {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl ParserBackend for MermaidBackend {
    fn name(&self) -> &'static str {
        "mermaid"
    }

    fn parse<'a>(&'a self, code: &'a str, _options: ParseOptions) -> BoxFuture<'a, Result<(), RawFailure>> {
        async move {
            let tool = self.setup.get_or_init(|| Self::prepare(&self.command)).await?;
            let output = executor::run_async(&tool.program, &tool.args, code).await?;
            if output.success {
                Ok(())
            } else {
                Err(RawFailure::message(output.failure_text()))
            }
        }
        .boxed()
    }

    fn translate(&self, failure: &RawFailure, code: &str) -> ParsedDiagnostic {
        free_text::translate(&failure.raw_message, code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::DiagnosticKind;

    #[test]
    fn test_default_command() {
        assert_eq!(MermaidBackend::default().command(), ["mermaid-parse"]);
        assert_eq!(MermaidBackend::new(vec!["npx".into(), "mmdc-check".into()]).command(), ["npx", "mmdc-check"]);
    }

    #[tokio::test]
    async fn test_missing_tool_becomes_failure() {
        let backend = MermaidBackend::new(vec!["nonexistent-mermaid-xyz123".to_string()]);
        let failure = backend.parse("graph TD", ParseOptions::default()).await.unwrap_err();
        assert!(failure.raw_message.contains("nonexistent-mermaid-xyz123"));
        assert_eq!(failure.position, None);

        // The failed setup is shared by clones
        let clone = backend.clone();
        assert!(clone.setup.is_initialized());
        assert!(clone.parse("pie", ParseOptions::default()).await.is_err());
    }

    #[test]
    fn test_translate_uses_free_text_cascade() {
        let backend = MermaidBackend::default();
        let failure = RawFailure::message("No diagram type detected matching given configuration for text: bogus");
        let diagnostic = backend.translate(&failure, "bogus");
        assert_eq!(diagnostic.kind, DiagnosticKind::UnknownEntryPoint);
    }
}
