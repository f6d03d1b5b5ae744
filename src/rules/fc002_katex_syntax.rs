use futures::FutureExt;
use futures::future::{self, BoxFuture};
use std::sync::Arc;

use crate::backend::{KatexBackend, ParserBackend};
use crate::fragments::{FragmentExtractor, MATH};
use crate::rule::{ReportFn, Rule, RuleParams};
use crate::rule_config_serde::RuleConfig;
use crate::validation::Validator;

mod fc002_config;
use fc002_config::FC002Config;

/// Rule FC002: math blocks must parse
///
/// Covers fenced `math`, `katex` and `latex` blocks as well as HTML elements
/// classed `math` or `katex`. The rule is synchronous: all fragments are
/// validated and reported before `check` returns.
#[derive(Clone)]
pub struct FC002KatexSyntax {
    config: FC002Config,
    extractor: FragmentExtractor,
    backend: Arc<dyn ParserBackend>,
}

impl Default for FC002KatexSyntax {
    fn default() -> Self {
        Self::new()
    }
}

impl FC002KatexSyntax {
    pub fn new() -> Self {
        Self::from_config_struct(FC002Config::default())
    }

    pub fn from_config_struct(config: FC002Config) -> Self {
        let backend = Arc::new(KatexBackend::new(config.command.clone()));
        Self {
            config,
            extractor: FragmentExtractor::new(MATH),
            backend,
        }
    }

    /// Same rule, validating through another parser
    pub fn with_backend(backend: Arc<dyn ParserBackend>) -> Self {
        Self {
            config: FC002Config::default(),
            extractor: FragmentExtractor::new(MATH),
            backend,
        }
    }

    pub fn config(&self) -> &FC002Config {
        &self.config
    }
}

impl Rule for FC002KatexSyntax {
    fn names(&self) -> &'static [&'static str] {
        &["FC002", FC002Config::RULE_NAME]
    }

    fn description(&self) -> &'static str {
        "Math blocks should be valid KaTeX"
    }

    fn tags(&self) -> &'static [&'static str] {
        &["math", "katex"]
    }

    fn is_async(&self) -> bool {
        false
    }

    fn check<'a>(&'a self, params: RuleParams<'a>, report: ReportFn<'a>) -> BoxFuture<'a, ()> {
        let fragments = self.extractor.extract(params.tokens);
        if !fragments.is_empty() {
            let validator = Validator::new(self.extractor.family(), self.backend.as_ref(), self.name());
            if params.config.basic {
                validator.run_basic(&fragments, report);
            } else {
                validator.run_immediate(&fragments, params.config.into(), report);
            }
        }
        future::ready(()).boxed()
    }

    fn from_config(config: &crate::config::Config) -> Box<dyn Rule>
    where
        Self: Sized,
    {
        let rule_config = crate::rule_config_serde::load_rule_config::<FC002Config>(config);
        Box::new(Self::from_config_struct(rule_config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{ParseOptions, RawFailure};
    use crate::config::{Config, RuleOptions};
    use crate::diagnostics::{ParsedDiagnostic, structured};
    use crate::lint_context::LintContext;
    use crate::rule::{DiagnosticKind, ValidationError};
    use std::sync::Mutex;

    /// Rejects `\unknown` at its character offset and records the options it saw
    #[derive(Default)]
    struct UnknownCommandBackend {
        seen: Mutex<Vec<ParseOptions>>,
    }

    impl ParserBackend for UnknownCommandBackend {
        fn name(&self) -> &'static str {
            "unknown-command"
        }

        fn parse<'a>(&'a self, code: &'a str, options: ParseOptions) -> BoxFuture<'a, Result<(), RawFailure>> {
            self.seen.lock().unwrap().push(options);
            let result = match code.find("\\unknown") {
                Some(offset) => Err(RawFailure::at(
                    "KaTeX parse error: Undefined control sequence: \\unknown",
                    code[..offset].chars().count(),
                )),
                None => Ok(()),
            };
            future::ready(result).boxed()
        }

        fn translate(&self, failure: &RawFailure, code: &str) -> ParsedDiagnostic {
            structured::translate(failure, code)
        }
    }

    /// Drives `check` by a single poll, which is all a synchronous rule may need
    fn run(rule: &FC002KatexSyntax, content: &str, options: RuleOptions) -> Vec<ValidationError> {
        let ctx = LintContext::new(content);
        let mut errors = Vec::new();
        let mut report = |error: ValidationError| errors.push(error);
        let outcome = rule
            .check(
                RuleParams {
                    tokens: &ctx.tokens,
                    config: options,
                },
                &mut report,
            )
            .now_or_never();
        assert!(outcome.is_some());
        errors
    }

    #[test]
    fn test_descriptor() {
        let rule = FC002KatexSyntax::new();
        assert_eq!(rule.name(), "FC002");
        assert!(rule.matches_name("katex-syntax"));
        assert!(!rule.is_async());
        assert_eq!(rule.tags(), &["math", "katex"]);
    }

    #[test]
    fn test_undefined_control_sequence_on_second_line() {
        let rule = FC002KatexSyntax::with_backend(Arc::new(UnknownCommandBackend::default()));
        let content = "Text\n\n```math\nx + y\n= \\unknown{z}\n```\n";
        let errors = run(&rule, content, RuleOptions::default());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].line_number, 4);
        assert_eq!(errors[0].kind, DiagnosticKind::PositionalStructuredFailure);
        assert!(errors[0].detail.starts_with("Undefined control sequence"));
        assert_eq!(errors[0].rule_name, Some("FC002"));
    }

    #[test]
    fn test_fence_aliases_and_html_carrier() {
        let rule = FC002KatexSyntax::with_backend(Arc::new(UnknownCommandBackend::default()));
        let content = "```latex\n\\unknown\n```\n\n```KaTeX\n\\frac{1}{2}\n```\n\n<div class=\"math\">\\unknown</div>\n";
        let errors = run(&rule, content, RuleOptions::default());
        let lines: Vec<_> = errors.iter().map(|e| e.line_number).collect();
        assert_eq!(lines, vec![1, 9]);
    }

    #[test]
    fn test_options_are_forwarded() {
        let backend = Arc::new(UnknownCommandBackend::default());
        let rule = FC002KatexSyntax::with_backend(backend.clone());
        let options = RuleOptions {
            display_mode: true,
            strict: true,
            ..Default::default()
        };
        run(&rule, "```math\nx^2\n```\n", options);
        let seen = backend.seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![ParseOptions {
                display_mode: true,
                strict: true
            }]
        );
    }

    #[test]
    fn test_basic_mode_reports_only_empty_blocks() {
        let backend = Arc::new(UnknownCommandBackend::default());
        let rule = FC002KatexSyntax::with_backend(backend.clone());
        let options = RuleOptions {
            basic: true,
            ..Default::default()
        };
        let errors = run(&rule, "```math\n\\unknown\n```\n\n```math\n\n```\n", options);
        assert!(backend.seen.lock().unwrap().is_empty());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, DiagnosticKind::EmptyContent);
        assert_eq!(errors[0].line_number, 5);
    }

    #[test]
    fn test_from_config_reads_command() {
        let config = Config::from_toml_str("[katex-syntax]\ncommand = [\"node\", \"katex-check.js\"]\n").unwrap();
        let rule = FC002KatexSyntax::from_config_struct(crate::rule_config_serde::load_rule_config(&config));
        assert_eq!(rule.config().command.len(), 2);
    }
}
