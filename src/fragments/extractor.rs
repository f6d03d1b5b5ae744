use regex::Regex;

use super::entities::decode_entities;
use super::{ContentFamily, Fragment};
use crate::lint_context::{DocumentToken, TokenKind};

/// Element names that may carry a fragment, in scan order
const HTML_CARRIER_TAGS: &[&str] = &["pre", "div", "code"];

/// Pulls the fragments of one content family out of a token stream.
#[derive(Debug, Clone)]
pub struct FragmentExtractor {
    family: ContentFamily,
    html_patterns: Vec<Regex>,
}

impl FragmentExtractor {
    pub fn new(family: ContentFamily) -> Self {
        let keywords = family
            .html_classes
            .iter()
            .map(|keyword| regex::escape(keyword))
            .collect::<Vec<_>>()
            .join("|");

        let html_patterns = HTML_CARRIER_TAGS
            .iter()
            .map(|tag| {
                let pattern = format!(
                    r#"(?is)<{tag}\b[^>]*?\bclass\s*=\s*(?:"[^"]*(?:{keywords})[^"]*"|'[^']*(?:{keywords})[^']*')[^>]*>(.*?)</{tag}\s*>"#
                );
                // Tags and keywords are escaped literals, so the pattern always compiles
                Regex::new(&pattern).unwrap()
            })
            .collect();

        Self { family, html_patterns }
    }

    pub fn family(&self) -> &ContentFamily {
        &self.family
    }

    /// All fragments of this family, in document order.
    pub fn extract(&self, tokens: &[DocumentToken]) -> Vec<Fragment> {
        let mut fragments = Vec::new();
        for token in tokens {
            match token.kind {
                TokenKind::Fence => {
                    if self.is_family_fence(&token.info_string) {
                        fragments.push(Fragment::new(token.content.clone(), token.line_number));
                    }
                }
                TokenKind::HtmlBlock => fragments.extend(self.extract_html(token)),
            }
        }
        fragments
    }

    fn is_family_fence(&self, info_string: &str) -> bool {
        let language = info_string.trim();
        self.family
            .fence_tags
            .iter()
            .any(|tag| tag.eq_ignore_ascii_case(language))
    }

    fn extract_html(&self, token: &DocumentToken) -> Vec<Fragment> {
        let content = token.content.as_str();

        // (element span, inner span) for every carrier any pattern finds
        let mut candidates: Vec<(usize, usize, usize, usize)> = Vec::new();
        for pattern in &self.html_patterns {
            for caps in pattern.captures_iter(content) {
                let (Some(element), Some(inner)) = (caps.get(0), caps.get(1)) else {
                    continue;
                };
                candidates.push((element.start(), element.end(), inner.start(), inner.end()));
            }
        }
        candidates.sort_unstable();
        candidates.dedup();

        // An enclosing carrier yields to the carrier nested inside it
        let innermost: Vec<_> = candidates
            .iter()
            .filter(|outer| {
                !candidates
                    .iter()
                    .any(|inner| inner != *outer && outer.0 <= inner.0 && inner.1 <= outer.1)
            })
            .collect();

        innermost
            .into_iter()
            .map(|&(element_start, _, inner_start, inner_end)| {
                let decoded = decode_entities(&content[inner_start..inner_end]);
                Fragment::new(decoded.trim(), token.line_number + count_newlines(&content[..element_start]))
            })
            .collect()
    }
}

fn count_newlines(text: &str) -> usize {
    text.bytes().filter(|&b| b == b'\n').count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragments::{MATH, MERMAID};
    use crate::lint_context::LintContext;

    fn extract(family: ContentFamily, content: &str) -> Vec<Fragment> {
        let ctx = LintContext::new(content);
        FragmentExtractor::new(family).extract(&ctx.tokens)
    }

    #[test]
    fn test_fenced_fragment() {
        let content = "# Doc\n\n```mermaid\nflowchart LR\nA --> B\n```\n";
        let fragments = extract(MERMAID, content);
        assert_eq!(fragments, vec![Fragment::new("flowchart LR\nA --> B\n", 3)]);
    }

    #[test]
    fn test_fence_tag_is_case_insensitive() {
        let content = "```Mermaid \ngraph TD\n```\n\n```mermaidjs\ngraph TD\n```\n";
        let fragments = extract(MERMAID, content);
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].start_line, 1);
    }

    #[test]
    fn test_fence_with_extra_info_is_not_a_carrier() {
        let content = "```mermaid title=\"x\"\ngraph TD\n```\n";
        assert!(extract(MERMAID, content).is_empty());
    }

    #[test]
    fn test_math_aliases() {
        let content = "```math\nx^2\n```\n\n```katex\ny\n```\n\n```latex\nz\n```\n\n```tex\nw\n```\n";
        let fragments = extract(MATH, content);
        let codes: Vec<_> = fragments.iter().map(|f| f.code.trim()).collect();
        assert_eq!(codes, vec!["x^2", "y", "z"]);
    }

    #[test]
    fn test_html_pre_carrier() {
        let content = "Text\n\n<pre class=\"mermaid\">\ngraph TD\n  A --&gt; B\n</pre>\n";
        let fragments = extract(MERMAID, content);
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].code, "graph TD\n  A --> B");
        assert_eq!(fragments[0].start_line, 3);
    }

    #[test]
    fn test_fragments_anchor_at_carrier_first_line() {
        let fenced = extract(MERMAID, "# T\n```mermaid\n  \n```\n");
        assert_eq!(fenced, vec![Fragment::new("  \n", 2)]);

        let html = extract(MERMAID, "<pre class=\"mermaid\">\ngraph TD\n</pre>\n");
        assert_eq!(html, vec![Fragment::new("graph TD", 1)]);
    }

    #[test]
    fn test_html_class_among_others() {
        let content = "<div class='diagram MERMAID wide' id=\"d1\">graph LR</div>\n";
        let fragments = extract(MERMAID, content);
        assert_eq!(fragments, vec![Fragment::new("graph LR", 1)]);
    }

    #[test]
    fn test_multiple_carriers_in_one_token() {
        let content = "<div>\n<div class=\"mermaid\">graph TD</div>\n<code class=\"mermaid\">\npie</code>\n</div>\n";
        let fragments = extract(MERMAID, content);
        assert_eq!(fragments, vec![Fragment::new("graph TD", 2), Fragment::new("pie", 3)]);
    }

    #[test]
    fn test_nested_carrier_keeps_innermost() {
        let content = "<pre class=\"language-mermaid\"><code class=\"language-mermaid\">graph TD</code></pre>\n";
        let fragments = extract(MERMAID, content);
        assert_eq!(fragments, vec![Fragment::new("graph TD", 1)]);
    }

    #[test]
    fn test_unrelated_html_is_ignored() {
        let content = "<div class=\"note\">graph TD</div>\n";
        assert!(extract(MERMAID, content).is_empty());
    }

    #[test]
    fn test_blank_line_splits_div_carrier() {
        // The tokenizer closes the HTML block at the blank line
        let content = "<div class=\"mermaid\">\ngraph TD\n\nA --> B\n</div>\n";
        let fragments = extract(MERMAID, content);
        assert!(fragments.is_empty());
    }

    #[test]
    fn test_extractor_is_reusable() {
        let extractor = FragmentExtractor::new(MERMAID);
        let ctx = LintContext::new("<pre class=\"mermaid\">graph TD</pre>\n");
        assert_eq!(extractor.extract(&ctx.tokens).len(), 1);
        assert_eq!(extractor.extract(&ctx.tokens).len(), 1);
    }
}
