//! Classification of free-text parser failures.
//!
//! The cascade is a table of `(kind, pattern, handler)` entries tried top to
//! bottom; the first pattern that matches the raw message decides the
//! diagnostic. New failure shapes are supported by adding an entry.

use regex::{Captures, Regex};
use std::sync::LazyLock;

use super::token_hints::describe_token;
use super::{GENERIC_HINT, ParsedDiagnostic, truncate_chars};
use crate::rule::DiagnosticKind;

/// Diagram keywords Mermaid accepts as the first statement
pub const DIAGRAM_TYPES: &[&str] = &[
    "flowchart",
    "graph",
    "sequenceDiagram",
    "classDiagram",
    "stateDiagram",
    "stateDiagram-v2",
    "erDiagram",
    "journey",
    "gantt",
    "pie",
    "quadrantChart",
    "requirementDiagram",
    "gitGraph",
    "C4Context",
    "mindmap",
    "timeline",
    "zenuml",
    "sankey-beta",
    "xychart-beta",
    "block-beta",
    "packet-beta",
    "kanban",
    "architecture-beta",
    "radar-beta",
];

const FALLBACK_MESSAGE_LIMIT: usize = 150;
const ENTRY_POINT_CONTEXT_LIMIT: usize = 40;

type Handler = fn(&Captures<'_>, &str, &str) -> ParsedDiagnostic;

struct FailureRule {
    kind: DiagnosticKind,
    pattern: Regex,
    handler: Handler,
}

impl FailureRule {
    fn new(kind: DiagnosticKind, pattern: &str, handler: Handler) -> Self {
        Self {
            kind,
            pattern: Regex::new(pattern).unwrap(),
            handler,
        }
    }
}

static CASCADE: LazyLock<Vec<FailureRule>> = LazyLock::new(|| {
    vec![
        FailureRule::new(
            DiagnosticKind::PositionalParseFailure,
            r"Parse error on line (\d+)",
            positional_parse_failure,
        ),
        FailureRule::new(DiagnosticKind::LexicalFailure, r"Lexical error on line (\d+)", lexical_failure),
        FailureRule::new(DiagnosticKind::UnknownEntryPoint, r"No diagram type detected", unknown_entry_point),
        FailureRule::new(
            DiagnosticKind::UnexpectedCharacter,
            r"(?is)unexpected character: ->(.)<- at offset: (\d+)",
            unexpected_character,
        ),
        FailureRule::new(
            DiagnosticKind::ExpectedToken,
            r"Expecting token of type '([^']+)'",
            expected_token,
        ),
        FailureRule::new(
            DiagnosticKind::EnumeratedAlternativesFailure,
            r"one of these possible Token sequences",
            enumerated_alternatives,
        ),
    ]
});

static GOT_TOKEN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)expecting\s+.*?,?\s*got\s+'([^']+)'").unwrap());
static PARSE_ERROR_HEADER_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*Parse error on line \d+:?\s*").unwrap());
static CARET_LINE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*-*\^\s*$").unwrap());

/// Classify a free-text failure raised while parsing `code`.
pub fn translate(raw_message: &str, code: &str) -> ParsedDiagnostic {
    CASCADE
        .iter()
        .find_map(|rule| {
            rule.pattern.captures(raw_message).map(|caps| {
                let mut diagnostic = (rule.handler)(&caps, raw_message, code);
                diagnostic.kind = rule.kind;
                diagnostic
            })
        })
        .unwrap_or_else(|| unknown_failure(raw_message))
}

fn captured_number(caps: &Captures<'_>, group: usize) -> Option<usize> {
    caps.get(group).and_then(|m| m.as_str().parse().ok())
}

fn positional_parse_failure(caps: &Captures<'_>, raw: &str, _code: &str) -> ParsedDiagnostic {
    let line = captured_number(caps, 1);
    let kind = DiagnosticKind::PositionalParseFailure;

    let diagnostic = match GOT_TOKEN_REGEX.captures(raw) {
        Some(got) => {
            let (message, hint) = describe_token(&got[1]);
            ParsedDiagnostic::new(kind, line, message).with_hint(hint)
        }
        None => {
            let first_line = raw.lines().next().unwrap_or_default();
            let stripped = PARSE_ERROR_HEADER_REGEX.replace(first_line, "");
            // Mermaid puts nothing after the header; the last line carries the detail then
            let message = if stripped.trim().is_empty() {
                raw.lines().rev().map(str::trim).find(|l| !l.is_empty()).unwrap_or_default()
            } else {
                stripped.trim()
            };
            ParsedDiagnostic::new(kind, line, message).with_hint(GENERIC_HINT)
        }
    };

    diagnostic.with_context(caret_context(raw))
}

/// The source line the parser echoed above its `---^` marker
fn caret_context(raw: &str) -> Option<String> {
    let lines: Vec<&str> = raw.lines().collect();
    let caret = lines.iter().position(|line| CARET_LINE_REGEX.is_match(line))?;
    let source = lines.get(caret.checked_sub(1)?)?;
    Some(source.trim_start().trim_start_matches("...").trim().to_string())
}

fn lexical_failure(caps: &Captures<'_>, _raw: &str, _code: &str) -> ParsedDiagnostic {
    ParsedDiagnostic::new(
        DiagnosticKind::LexicalFailure,
        captured_number(caps, 1),
        "Unrecognized text or keyword",
    )
    .with_hint("Check for typos in keywords, unsupported characters, or labels that need quoting")
}

fn unknown_entry_point(_caps: &Captures<'_>, _raw: &str, code: &str) -> ParsedDiagnostic {
    let first_line = code.trim().lines().next().map(str::trim).unwrap_or_default();
    let shown = if first_line.is_empty() { "(empty)" } else { first_line };

    ParsedDiagnostic::new(
        DiagnosticKind::UnknownEntryPoint,
        Some(1),
        format!("Unknown diagram type \"{shown}\""),
    )
    .with_hint(format!("Valid types: {}", DIAGRAM_TYPES.join(", ")))
    .with_context(Some(truncate_chars(first_line, ENTRY_POINT_CONTEXT_LIMIT).to_string()))
}

fn unexpected_character(caps: &Captures<'_>, _raw: &str, code: &str) -> ParsedDiagnostic {
    let character = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
    let line = captured_number(caps, 2).map(|offset| offset_to_line(code, offset));

    ParsedDiagnostic::new(
        DiagnosticKind::UnexpectedCharacter,
        line,
        format!("Unexpected character '{character}'"),
    )
    .with_hint(GENERIC_HINT)
}

fn expected_token(caps: &Captures<'_>, _raw: &str, _code: &str) -> ParsedDiagnostic {
    ParsedDiagnostic::new(DiagnosticKind::ExpectedToken, Some(1), format!("Expected `{}`", &caps[1])).with_hint(GENERIC_HINT)
}

fn enumerated_alternatives(_caps: &Captures<'_>, _raw: &str, _code: &str) -> ParsedDiagnostic {
    ParsedDiagnostic::new(DiagnosticKind::EnumeratedAlternativesFailure, Some(1), "Invalid syntax")
        .with_hint("The parser expected a different statement here; compare it with the documented syntax of this diagram type")
}

fn unknown_failure(raw: &str) -> ParsedDiagnostic {
    let first_line = raw.lines().map(str::trim).find(|l| !l.is_empty()).unwrap_or_default();
    ParsedDiagnostic::new(
        DiagnosticKind::UnknownFailureFormat,
        None,
        truncate_chars(first_line, FALLBACK_MESSAGE_LIMIT),
    )
    .with_hint(GENERIC_HINT)
}

/// 1-based line holding the character at `offset`.
///
/// A newline belongs to the line it terminates. Offsets past the end land on
/// the last line.
pub fn offset_to_line(code: &str, offset: usize) -> usize {
    let mut covered = 0;
    let mut line_count = 0;
    for (index, line) in code.split('\n').enumerate() {
        line_count = index + 1;
        covered += line.chars().count() + 1;
        if offset < covered {
            return line_count;
        }
    }
    line_count.max(1)
}
