//! Parser stand-ins that word their failures like the real tools.
#![allow(dead_code)]

use futures::FutureExt;
use futures::future::{self, BoxFuture};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use fragcheck_lib::backend::{ExecutorError, ParseOptions, ParserBackend, RawFailure, SharedSetup};
use fragcheck_lib::diagnostics::free_text::{self, DIAGRAM_TYPES};
use fragcheck_lib::diagnostics::{ParsedDiagnostic, structured};
use fragcheck_lib::lint_context::LintContext;
use fragcheck_lib::rule::{Rule, RuleParams, ValidationError};
use fragcheck_lib::config::RuleOptions;

/// Mermaid-like parser: rejects unknown diagram types and unclosed `[`
#[derive(Default)]
pub struct FakeMermaid {
    pub calls: AtomicUsize,
}

impl FakeMermaid {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn outcome(code: &str) -> Result<(), RawFailure> {
        let first_word = code.split_whitespace().next().unwrap_or_default();
        if !DIAGRAM_TYPES.contains(&first_word) {
            return Err(RawFailure::message(format!(
                "No diagram type detected matching given configuration for text: {code}"
            )));
        }
        for (index, line) in code.lines().enumerate() {
            if line.contains('[') && !line.contains(']') {
                return Err(RawFailure::message(format!(
                    "Parse error on line {}:\n...{line}\n{}^\nExpecting 'SQE', 'PE', 'UNICODE_TEXT', got 'EOF'",
                    index + 1,
                    "-".repeat(line.len() + 3)
                )));
            }
        }
        Ok(())
    }
}

impl ParserBackend for FakeMermaid {
    fn name(&self) -> &'static str {
        "fake-mermaid"
    }

    fn parse<'a>(&'a self, code: &'a str, _options: ParseOptions) -> BoxFuture<'a, Result<(), RawFailure>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        future::ready(Self::outcome(code)).boxed()
    }

    fn translate(&self, failure: &RawFailure, code: &str) -> ParsedDiagnostic {
        free_text::translate(&failure.raw_message, code)
    }
}

const KNOWN_COMMANDS: &[&str] = &["frac", "sqrt", "alpha", "beta", "sum", "int", "cdot", "left", "right"];

/// KaTeX-like parser: reports unknown commands and unclosed groups with an offset
#[derive(Default)]
pub struct FakeKatex {
    pub calls: AtomicUsize,
}

impl FakeKatex {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn outcome(code: &str) -> Result<(), RawFailure> {
        let chars: Vec<char> = code.chars().collect();
        let mut depth = 0usize;
        let mut index = 0;
        while index < chars.len() {
            match chars[index] {
                '\\' => {
                    let name: String = chars[index + 1..].iter().take_while(|c| c.is_ascii_alphabetic()).collect();
                    if !name.is_empty() && !KNOWN_COMMANDS.contains(&name.as_str()) {
                        return Err(RawFailure::at(
                            format!("KaTeX parse error: Undefined control sequence: \\{name} at position {}", index + 1),
                            index,
                        ));
                    }
                    index += name.len();
                }
                '{' => depth += 1,
                '}' => depth = depth.saturating_sub(1),
                _ => {}
            }
            index += 1;
        }
        if depth > 0 {
            return Err(RawFailure::at(
                "KaTeX parse error: Expected '}', got 'EOF' at end of input",
                chars.len(),
            ));
        }
        Ok(())
    }
}

impl ParserBackend for FakeKatex {
    fn name(&self) -> &'static str {
        "fake-katex"
    }

    fn parse<'a>(&'a self, code: &'a str, _options: ParseOptions) -> BoxFuture<'a, Result<(), RawFailure>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        future::ready(Self::outcome(code)).boxed()
    }

    fn translate(&self, failure: &RawFailure, code: &str) -> ParsedDiagnostic {
        structured::translate(failure, code)
    }
}

/// Backend whose slow one-time setup counts how often it runs
pub struct SlowSetup {
    setup: SharedSetup<String>,
    pub setups: Arc<AtomicUsize>,
    fail: bool,
}

impl SlowSetup {
    pub fn new(fail: bool) -> Self {
        Self {
            setup: SharedSetup::new(),
            setups: Arc::new(AtomicUsize::new(0)),
            fail,
        }
    }
}

impl ParserBackend for SlowSetup {
    fn name(&self) -> &'static str {
        "slow-setup"
    }

    fn parse<'a>(&'a self, code: &'a str, _options: ParseOptions) -> BoxFuture<'a, Result<(), RawFailure>> {
        async move {
            let setups = self.setups.clone();
            let fail = self.fail;
            self.setup
                .get_or_init(|| async move {
                    setups.fetch_add(1, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(25)).await;
                    if fail {
                        Err(ExecutorError::ToolNotFound {
                            tool: "slow-parse".to_string(),
                        })
                    } else {
                        Ok("slow-parse 1.0".to_string())
                    }
                })
                .await?;
            FakeMermaid::outcome(code)
        }
        .boxed()
    }

    fn translate(&self, failure: &RawFailure, code: &str) -> ParsedDiagnostic {
        free_text::translate(&failure.raw_message, code)
    }
}

/// Run one rule over `content` and collect what it reports
pub async fn check(rule: &dyn Rule, content: &str, options: RuleOptions) -> Vec<ValidationError> {
    let ctx = LintContext::new(content);
    let mut errors = Vec::new();
    let mut report = |error: ValidationError| errors.push(error);
    rule.check(
        RuleParams {
            tokens: &ctx.tokens,
            config: options,
        },
        &mut report,
    )
    .await;
    errors
}
