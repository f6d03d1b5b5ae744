//! Adapters around the external grammar parsers.
//!
//! Every backend answers the same question, "does this code parse?", and
//! reports a failure as a [`RawFailure`]. Backends differ in how much structure
//! their failures carry: the Mermaid tool only produces free text, while the
//! KaTeX tool reports a message and a character offset. Each backend also
//! owns the translation of its own failures, so callers never need to know
//! which backend they hold.

pub mod executor;
pub mod katex;
pub mod mermaid;
pub mod setup;

pub use executor::{ExecutorError, ToolOutput};
pub use katex::KatexBackend;
pub use mermaid::MermaidBackend;
pub use setup::SharedSetup;

use futures::future::BoxFuture;

use crate::config::RuleOptions;
use crate::diagnostics::ParsedDiagnostic;

/// A parser failure in backend-neutral form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFailure {
    pub raw_message: String,
    /// Character offset into the fragment code, for backends that expose one
    pub position: Option<usize>,
}

impl RawFailure {
    pub fn message(raw_message: impl Into<String>) -> Self {
        Self {
            raw_message: raw_message.into(),
            position: None,
        }
    }

    pub fn at(raw_message: impl Into<String>, position: usize) -> Self {
        Self {
            raw_message: raw_message.into(),
            position: Some(position),
        }
    }
}

impl From<ExecutorError> for RawFailure {
    fn from(e: ExecutorError) -> Self {
        Self::message(e.to_string())
    }
}

/// Options forwarded verbatim to a backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    pub display_mode: bool,
    pub strict: bool,
}

impl From<RuleOptions> for ParseOptions {
    fn from(options: RuleOptions) -> Self {
        Self {
            display_mode: options.display_mode,
            strict: options.strict,
        }
    }
}

pub trait ParserBackend: Send + Sync {
    fn name(&self) -> &'static str;

    /// Parse `code`, resolving to `Err` with whatever the parser reported.
    fn parse<'a>(&'a self, code: &'a str, options: ParseOptions) -> BoxFuture<'a, Result<(), RawFailure>>;

    /// Turn one of this backend's failures into a fragment-relative diagnostic.
    fn translate(&self, failure: &RawFailure, code: &str) -> ParsedDiagnostic;
}
