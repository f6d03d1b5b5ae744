pub mod backend;
pub mod config;
pub mod diagnostics;
pub mod exit_codes;
pub mod fragments;
pub mod lint_context;
pub mod output;
pub mod rule;
pub mod rule_config_serde;
pub mod rules;
pub mod validation;

pub use rules::*;

pub use crate::lint_context::LintContext;
use crate::config::Config;
use crate::rule::{Rule, RuleParams, ValidationError};

/// Validate the fragments of a document against the given rules
///
/// Assumes the provided `rules` are the final, configured and filtered set to
/// run. The document is tokenized once and shared by every rule. Diagnostics
/// come back sorted by line; diagnostics on the same line keep rule order.
pub async fn lint(content: &str, rules: &[Box<dyn Rule>], config: &Config) -> Vec<ValidationError> {
    let ctx = LintContext::new(content);
    let mut errors = Vec::new();

    for rule in rules {
        let options = config.rule_options(rule.names());
        let before = errors.len();
        let mut report = |error: ValidationError| errors.push(error);
        rule.check(
            RuleParams {
                tokens: &ctx.tokens,
                config: options,
            },
            &mut report,
        )
        .await;
        log::debug!("{}: {} diagnostic(s)", rule.name(), errors.len() - before);
    }

    errors.sort_by_key(|error| error.line_number);
    errors
}
