use regex::{Captures, Regex};
use std::borrow::Cow;
use std::sync::LazyLock;

static ENTITY_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"&(lt|gt|amp|quot|apos|#39|nbsp);").unwrap());

/// Decode the handful of named entities that show up in HTML-carried fragments.
///
/// Decoding is a single pass, so `&amp;lt;` becomes `&lt;` and not `<`.
/// Anything outside the fixed set passes through unchanged.
pub fn decode_entities(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }
    ENTITY_REGEX.replace_all(text, |caps: &Captures| match &caps[1] {
        "lt" => "<",
        "gt" => ">",
        "amp" => "&",
        "quot" => "\"",
        "apos" | "#39" => "'",
        // nbsp
        _ => " ",
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decodes_fixed_set() {
        assert_eq!(decode_entities("A --&gt; B &amp;&amp; C&lt;D"), "A --> B && C<D");
        assert_eq!(decode_entities("&quot;x&quot; &#39;y&#39; &apos;z&apos;"), "\"x\" 'y' 'z'");
        assert_eq!(decode_entities("a&nbsp;b"), "a b");
    }

    #[test]
    fn test_unknown_entities_pass_through() {
        assert_eq!(decode_entities("&copy; &#x3C; &lt"), "&copy; &#x3C; &lt");
    }

    #[test]
    fn test_single_pass() {
        assert_eq!(decode_entities("&amp;lt;"), "&lt;");
    }

    #[test]
    fn test_borrows_when_nothing_to_decode() {
        assert!(matches!(decode_entities("graph TD"), Cow::Borrowed(_)));
    }
}
