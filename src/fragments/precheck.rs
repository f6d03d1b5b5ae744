use regex::Regex;
use std::sync::LazyLock;

use super::{ContentFamily, Fragment};
use crate::rule::{DiagnosticKind, ValidationError};

static ENTRY_POINT_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_-]*").unwrap());

/// Reject fragments with no content before any parser runs.
///
/// On success the returned fragment holds the trimmed code and keeps the
/// carrier's `start_line`.
pub fn precheck(fragment: &Fragment, family: &ContentFamily) -> Result<Fragment, ValidationError> {
    let trimmed = fragment.code.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new(
            fragment.start_line,
            family.empty_message,
            Some(family.empty_hint),
            None,
            DiagnosticKind::EmptyContent,
        ));
    }

    Ok(Fragment::new(trimmed, fragment.start_line))
}

/// Basic-mode structural check: the first line that is neither blank nor a
/// comment must open with an identifier-shaped declaration keyword.
///
/// Returns the fragment-relative line of the offending line on failure.
pub fn has_entry_point(code: &str, family: &ContentFamily) -> Result<(), usize> {
    for (index, line) in code.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with(family.comment_prefix) {
            continue;
        }
        return if ENTRY_POINT_REGEX.is_match(line) { Ok(()) } else { Err(index + 1) };
    }
    Err(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragments::{MATH, MERMAID};

    #[test]
    fn test_whitespace_only_is_empty_content() {
        let fragment = Fragment::new("  \n\t\n ", 2);
        let error = precheck(&fragment, &MERMAID).unwrap_err();
        assert_eq!(error.kind, DiagnosticKind::EmptyContent);
        assert_eq!(error.line_number, 2);
        assert!(error.detail.contains("Empty Mermaid diagram"));
        assert!(error.detail.contains("Add a diagram type and content"));
    }

    #[test]
    fn test_empty_message_is_family_specific() {
        let error = precheck(&Fragment::new("", 7), &MATH).unwrap_err();
        assert_eq!(error.line_number, 7);
        assert!(error.detail.starts_with("Empty math expression"));
    }

    #[test]
    fn test_trims_and_keeps_start_line() {
        let fragment = Fragment::new("\n\n  graph TD\n  A --> B  \n\n", 5);
        let checked = precheck(&fragment, &MERMAID).unwrap();
        assert_eq!(checked.code, "graph TD\n  A --> B");
        assert_eq!(checked.start_line, 5);
    }

    #[test]
    fn test_entry_point_skips_comments_and_blanks() {
        assert_eq!(has_entry_point("%% a comment\n\nsequenceDiagram\nA->>B: hi", &MERMAID), Ok(()));
        assert_eq!(has_entry_point("stateDiagram-v2", &MERMAID), Ok(()));
    }

    #[test]
    fn test_entry_point_missing() {
        assert_eq!(has_entry_point("%% comment\n--> B", &MERMAID), Err(2));
        assert_eq!(has_entry_point("[A] --> B", &MERMAID), Err(1));
        assert_eq!(has_entry_point("%% only a comment", &MERMAID), Err(1));
    }
}
