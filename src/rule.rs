//!
//! This module defines the Rule trait and the diagnostic types rules report through.
//! A rule is a host-facing descriptor: names, description, tags, the token source it
//! expects, whether it suspends, and the `check` entry point driven by [`crate::lint`].

use dyn_clone::DynClone;
use futures::future::BoxFuture;
use serde::Serialize;

use crate::config::RuleOptions;
use crate::lint_context::DocumentToken;

/// Taxonomy of everything a rule can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticKind {
    EmptyContent,
    MissingEntryPoint,
    PositionalParseFailure,
    LexicalFailure,
    UnknownEntryPoint,
    UnexpectedCharacter,
    ExpectedToken,
    EnumeratedAlternativesFailure,
    UnknownFailureFormat,
    PositionalStructuredFailure,
    UnknownStructuredFailure,
}

/// A document-absolute diagnostic handed to the report callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    /// 1-based line in the full document
    pub line_number: usize,
    /// Message, followed by `". " + hint` when a hint exists
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    pub kind: DiagnosticKind,
    pub rule_name: Option<&'static str>,
}

impl ValidationError {
    pub fn new(line_number: usize, message: &str, hint: Option<&str>, context: Option<String>, kind: DiagnosticKind) -> Self {
        let detail = match hint {
            Some(hint) if !hint.is_empty() => format!("{message}. {hint}"),
            _ => message.to_string(),
        };
        Self {
            line_number,
            detail,
            context,
            kind,
            rule_name: None,
        }
    }

    pub fn with_rule(mut self, rule_name: &'static str) -> Self {
        self.rule_name = Some(rule_name);
        self
    }
}

/// Inputs handed to [`Rule::check`].
#[derive(Debug, Clone, Copy)]
pub struct RuleParams<'a> {
    pub tokens: &'a [DocumentToken],
    pub config: RuleOptions,
}

/// Callback invoked once per diagnostic.
pub type ReportFn<'a> = &'a mut (dyn FnMut(ValidationError) + Send);

pub trait Rule: DynClone + Send + Sync {
    /// Identifiers the rule answers to; the first one is the canonical code.
    fn names(&self) -> &'static [&'static str];
    fn description(&self) -> &'static str;
    fn tags(&self) -> &'static [&'static str];

    /// Name of the tokenizer whose output the rule expects
    fn token_source(&self) -> &'static str {
        "pulldown-cmark"
    }

    /// Whether `check` may suspend. Synchronous rules finish their work before
    /// the returned future is first polled.
    fn is_async(&self) -> bool;

    fn check<'a>(&'a self, params: RuleParams<'a>, report: ReportFn<'a>) -> BoxFuture<'a, ()>;

    fn name(&self) -> &'static str {
        self.names().first().copied().unwrap_or("unknown")
    }

    /// Whether `id` (case-insensitive) is one of this rule's names
    fn matches_name(&self, id: &str) -> bool {
        self.names().iter().any(|name| name.eq_ignore_ascii_case(id))
    }

    /// Factory: create a rule from config (if present), or use defaults.
    fn from_config(config: &crate::config::Config) -> Box<dyn Rule>
    where
        Self: Sized;
}

// Implement the cloning logic for the Rule trait object
dyn_clone::clone_trait_object!(Rule);
