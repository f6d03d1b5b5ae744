use super::ParsedDiagnostic;
use crate::backend::RawFailure;
use crate::rule::DiagnosticKind;

/// Prefix KaTeX puts in front of every parse error
const TOOL_PREFIX: &str = "KaTeX parse error: ";

/// Characters of source shown on each side of the failure position
const CONTEXT_RADIUS: usize = 15;

/// Well-known failure phrases and what to do about them, tried in order
const PHRASE_HINTS: &[(&str, &str)] = &[
    (
        "Undefined control sequence",
        "Check the command name for typos; only commands KaTeX supports can be used",
    ),
    (
        "Expected '}'",
        "A group opened with '{' is never closed; add the matching '}'",
    ),
    (
        "Expected group",
        "A command is missing a required argument; pass it in braces, e.g. \\frac{a}{b}",
    ),
    (
        "end of input",
        "The expression ends too early; finish the command or close the open environment",
    ),
];

/// Translate a failure that may carry a character offset into `code`.
pub fn translate(failure: &RawFailure, code: &str) -> ParsedDiagnostic {
    let message = failure.raw_message.trim();
    let message = message.strip_prefix(TOOL_PREFIX).unwrap_or(message);
    let hint = hint_for(message).unwrap_or_default();

    match failure.position {
        Some(position) => ParsedDiagnostic::new(
            DiagnosticKind::PositionalStructuredFailure,
            Some(position_to_line(code, position)),
            message,
        )
        .with_hint(hint)
        .with_context(Some(context_around(code, position))),
        None => ParsedDiagnostic::new(DiagnosticKind::UnknownStructuredFailure, None, message).with_hint(hint),
    }
}

fn hint_for(message: &str) -> Option<&'static str> {
    PHRASE_HINTS
        .iter()
        .find(|(phrase, _)| message.contains(phrase))
        .map(|&(_, hint)| hint)
}

/// 1-based line of the character at `position`.
///
/// Only newlines strictly before the position count, so a position that sits
/// on a newline reports the line that newline ends.
pub fn position_to_line(code: &str, position: usize) -> usize {
    1 + code.chars().take(position).filter(|&c| c == '\n').count()
}

fn context_around(code: &str, position: usize) -> String {
    let start = position.saturating_sub(CONTEXT_RADIUS);
    code.chars()
        .skip(start)
        .take(position - start + CONTEXT_RADIUS)
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect()
}
