//! Locating embedded code fragments in a tokenized document.
//!
//! A fragment is pulled out of one of two carriers:
//! - a fenced code block whose language tag names the content family, or
//! - an HTML block holding a `pre`, `div` or `code` element whose `class`
//!   attribute mentions one of the family's keywords.
//!
//! HTML carriers are only seen whole when the tokenizer keeps them in one
//! block. CommonMark ends most HTML blocks at a blank line, so a `div`
//! carrier with a blank line inside arrives as two tokens and yields two
//! incomplete fragments.

pub mod entities;
pub mod extractor;
pub mod precheck;

pub use entities::decode_entities;
pub use extractor::FragmentExtractor;
pub use precheck::{has_entry_point, precheck};

/// An extracted code region pending validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub code: String,
    /// 1-based document line of the carrier's first line (fence or HTML element)
    pub start_line: usize,
}

impl Fragment {
    pub fn new(code: impl Into<String>, start_line: usize) -> Self {
        Self {
            code: code.into(),
            start_line: start_line.max(1),
        }
    }

    /// Document line of a 1-based fragment-relative line
    pub fn absolute_line(&self, relative: usize) -> usize {
        self.start_line.saturating_add(relative.max(1) - 1)
    }
}

/// Everything that is specific to one embedded grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentFamily {
    /// Human-readable name used in messages
    pub display_name: &'static str,
    /// Fence language tags routed to this family (compared case-insensitively)
    pub fence_tags: &'static [&'static str],
    /// Substrings of an HTML `class` attribute that mark a carrier
    pub html_classes: &'static [&'static str],
    pub empty_message: &'static str,
    pub empty_hint: &'static str,
    /// Line prefix skipped by the entry-point check
    pub comment_prefix: &'static str,
    /// Whether basic mode requires a leading declaration keyword
    pub checks_entry_point: bool,
}

pub const MERMAID: ContentFamily = ContentFamily {
    display_name: "Mermaid diagram",
    fence_tags: &["mermaid"],
    html_classes: &["mermaid"],
    empty_message: "Empty Mermaid diagram",
    empty_hint: "Add a diagram type and content, e.g. \"flowchart LR\"",
    comment_prefix: "%%",
    checks_entry_point: true,
};

pub const MATH: ContentFamily = ContentFamily {
    display_name: "math expression",
    fence_tags: &["math", "katex", "latex"],
    html_classes: &["math", "katex"],
    empty_message: "Empty math expression",
    empty_hint: "Add a TeX expression or remove the empty block",
    comment_prefix: "%",
    checks_entry_point: false,
};
