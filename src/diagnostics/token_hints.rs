//! Plain-language descriptions of Mermaid grammar tokens.
//!
//! The Mermaid parser names the token it choked on ("got 'SQE'"). Those names
//! mean nothing to a document author, so the common ones are mapped to a
//! message and a concrete fix.

use phf::phf_map;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenHint {
    pub message: &'static str,
    pub hint: &'static str,
}

pub static TOKEN_HINTS: phf::Map<&'static str, TokenHint> = phf_map! {
    "EOF" => TokenHint {
        message: "Unexpected end of diagram",
        hint: "A statement is incomplete; check for an unclosed bracket or quote, or an arrow with no target",
    },
    "NEWLINE" => TokenHint {
        message: "Unexpected line break",
        hint: "The statement on this line is incomplete; finish it before starting a new line",
    },
    "SQS" => TokenHint {
        message: "Unexpected '['",
        hint: "A label in square brackets must follow a node id, e.g. A[Label]",
    },
    "SQE" => TokenHint {
        message: "Unexpected ']'",
        hint: "Check that every '[' has a matching ']' and that labels with brackets are quoted",
    },
    "PS" => TokenHint {
        message: "Unexpected '('",
        hint: "A rounded label must follow a node id, e.g. A(Label)",
    },
    "PE" => TokenHint {
        message: "Unexpected ')'",
        hint: "Check that every '(' has a matching ')' and that labels with parentheses are quoted",
    },
    "DIAMOND_START" => TokenHint {
        message: "Unexpected '{'",
        hint: "A decision label must follow a node id, e.g. A{Label}",
    },
    "DIAMOND_STOP" => TokenHint {
        message: "Unexpected '}'",
        hint: "Check that every '{' has a matching '}'",
    },
    "TAGEND" => TokenHint {
        message: "Unexpected '>'",
        hint: "Asymmetric labels are written A>Label]; elsewhere '>' must be part of an arrow such as -->",
    },
    "PIPE" => TokenHint {
        message: "Unexpected '|'",
        hint: "Link labels go between two pipes right after the arrow, e.g. A -->|Label| B",
    },
    "MINUS" => TokenHint {
        message: "Unexpected '-'",
        hint: "Arrows need at least two dashes, e.g. A --> B",
    },
    "AMP" => TokenHint {
        message: "Unexpected '&'",
        hint: "'&' joins nodes on one side of a link, e.g. A & B --> C",
    },
    "SEMI" => TokenHint {
        message: "Unexpected ';'",
        hint: "Remove the stray semicolon or put the next statement after it",
    },
    "COLON" => TokenHint {
        message: "Unexpected ':'",
        hint: "Quote labels that contain ':', e.g. A[\"key: value\"]",
    },
    "STR" => TokenHint {
        message: "Unexpected quoted text",
        hint: "Quoted text is only allowed inside a label, e.g. A[\"Quoted label\"]",
    },
    "LINK" => TokenHint {
        message: "Unexpected link",
        hint: "A link must connect two nodes, e.g. A --> B",
    },
    "START_LINK" => TokenHint {
        message: "Unexpected start of link",
        hint: "Finish the link with an arrow and a target node, e.g. A -- text --> B",
    },
    "NODE_STRING" => TokenHint {
        message: "Unexpected text",
        hint: "Check for a missing arrow between nodes, or quote labels containing special characters",
    },
    "UNICODE_TEXT" => TokenHint {
        message: "Unexpected special character",
        hint: "Quote labels containing special or non-ASCII characters, e.g. A[\"Label\"]",
    },
    "end" => TokenHint {
        message: "Unexpected 'end'",
        hint: "'end' closes a subgraph; check that every 'end' has a matching 'subgraph', and rename nodes called 'end'",
    },
    "SPACE" => TokenHint {
        message: "Unexpected whitespace",
        hint: "Remove the extra space or join the statement onto one line",
    },
};

/// Message and hint for `token`. Unknown tokens get a generic message that
/// names the token itself.
pub fn describe_token(token: &str) -> (String, String) {
    match TOKEN_HINTS.get(token) {
        Some(entry) => (entry.message.to_string(), entry.hint.to_string()),
        None => (
            format!("Syntax error: unexpected \"{token}\""),
            super::GENERIC_HINT.to_string(),
        ),
    }
}
