use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};

/// Kind of carrier a [`DocumentToken`] came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Fence,
    HtmlBlock,
}

/// A block-level token produced by the Markdown tokenizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentToken {
    pub kind: TokenKind,
    /// Raw info string of a fence; empty for HTML blocks
    pub info_string: String,
    pub content: String,
    /// 1-based line of the opening fence or first HTML line
    pub line_number: usize,
}

pub struct LintContext<'a> {
    pub content: &'a str,
    pub tokens: Vec<DocumentToken>,
    pub line_offsets: Vec<usize>,
}

impl<'a> LintContext<'a> {
    pub fn new(content: &'a str) -> Self {
        let mut line_offsets = vec![0];
        for (i, c) in content.char_indices() {
            if c == '\n' {
                line_offsets.push(i + 1);
            }
        }
        let mut ctx = Self {
            content,
            tokens: Vec::new(),
            line_offsets,
        };
        ctx.tokens = ctx.tokenize();
        ctx
    }

    /// Map a byte offset to (line, column)
    pub fn offset_to_line_col(&self, offset: usize) -> (usize, usize) {
        match self.line_offsets.binary_search(&offset) {
            Ok(line) => (line + 1, 1),
            Err(line) => {
                let line_start = self.line_offsets.get(line.wrapping_sub(1)).copied().unwrap_or(0);
                (line, offset - line_start + 1)
            }
        }
    }

    fn tokenize(&self) -> Vec<DocumentToken> {
        let mut tokens = Vec::new();
        let mut current: Option<DocumentToken> = None;

        let parser = Parser::new_ext(self.content, Options::all()).into_offset_iter();

        for (event, range) in parser {
            match event {
                Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) => {
                    current = Some(DocumentToken {
                        kind: TokenKind::Fence,
                        info_string: info.to_string(),
                        content: String::new(),
                        line_number: self.offset_to_line_col(range.start).0,
                    });
                }
                Event::Start(Tag::HtmlBlock) => {
                    current = Some(DocumentToken {
                        kind: TokenKind::HtmlBlock,
                        info_string: String::new(),
                        content: String::new(),
                        line_number: self.offset_to_line_col(range.start).0,
                    });
                }
                Event::Text(text) | Event::Html(text) => {
                    if let Some(token) = current.as_mut() {
                        token.content.push_str(&text);
                    }
                }
                Event::End(TagEnd::CodeBlock) | Event::End(TagEnd::HtmlBlock) => {
                    // Indented code blocks never open a token
                    if let Some(token) = current.take() {
                        tokens.push(token);
                    }
                }
                _ => {}
            }
        }

        tokens
    }
}
