//! Translation of raw parser failures into actionable diagnostics.
//!
//! [`free_text`] classifies failures that only carry a message, using an ordered
//! cascade of patterns. [`structured`] handles failures that come with a
//! character offset. Both produce a fragment-relative [`ParsedDiagnostic`].

pub mod free_text;
pub mod structured;
pub mod token_hints;

use crate::fragments::Fragment;
use crate::rule::{DiagnosticKind, ValidationError};

/// Hint used when nothing more specific is known about a failure
pub const GENERIC_HINT: &str = "Check the syntax near this line";

/// A diagnostic relative to its fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDiagnostic {
    /// 1-based line within the fragment, when the failure names one
    pub line: Option<usize>,
    /// Never empty
    pub message: String,
    pub hint: Option<String>,
    pub context: Option<String>,
    pub kind: DiagnosticKind,
}

impl ParsedDiagnostic {
    pub fn new(kind: DiagnosticKind, line: Option<usize>, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            "Unknown parse error".to_string()
        } else {
            message
        };
        Self {
            line,
            message,
            hint: None,
            context: None,
            kind,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        let hint = hint.into();
        self.hint = (!hint.is_empty()).then_some(hint);
        self
    }

    pub fn with_context(mut self, context: Option<String>) -> Self {
        self.context = context.filter(|c| !c.trim().is_empty());
        self
    }

    /// Anchor the diagnostic in the document. Failures without a line point at
    /// the fragment's first line.
    pub fn into_validation_error(self, fragment: &Fragment) -> ValidationError {
        let line_number = match self.line {
            Some(line) => fragment.absolute_line(line),
            None => fragment.start_line,
        };
        ValidationError::new(line_number, &self.message, self.hint.as_deref(), self.context, self.kind)
    }
}

/// First `max` characters of `text`
pub(crate) fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_message_is_never_empty() {
        let diagnostic = ParsedDiagnostic::new(DiagnosticKind::UnknownFailureFormat, None, "  ");
        assert_eq!(diagnostic.message, "Unknown parse error");
    }

    #[test]
    fn test_into_validation_error_offsets_line() {
        let fragment = Fragment::new("a\nb\nc", 2);
        let error = ParsedDiagnostic::new(DiagnosticKind::PositionalParseFailure, Some(3), "Bad")
            .with_hint("Fix it")
            .with_context(Some("c".to_string()))
            .into_validation_error(&fragment);
        assert_eq!(
            error,
            ValidationError {
                line_number: 4,
                detail: "Bad. Fix it".to_string(),
                context: Some("c".to_string()),
                kind: DiagnosticKind::PositionalParseFailure,
                rule_name: None,
            }
        );
    }

    #[test]
    fn test_missing_line_points_at_fragment_start() {
        let fragment = Fragment::new("x", 9);
        let error = ParsedDiagnostic::new(DiagnosticKind::UnknownFailureFormat, None, "Odd").into_validation_error(&fragment);
        assert_eq!(error.line_number, 9);
        assert_eq!(error.detail, "Odd");
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("abcdef", 3), "abc");
        assert_eq!(truncate_chars("ab", 3), "ab");
        assert_eq!(truncate_chars("ééé", 2), "éé");
    }
}
