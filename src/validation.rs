//! Runs extracted fragments through precheck, backend and translation.
//!
//! Three modes are supported:
//! - **basic**: precheck plus the entry-point check, no parser involved;
//! - **immediate**: fragments are validated one after another and each
//!   failure is reported as soon as it is known;
//! - **full**: every fragment is validated concurrently and the failures are
//!   reported together, in fragment order, once all of them have finished.
//!
//! Nothing is ever returned as an error: every failure ends up as a reported
//! [`ValidationError`].

use futures::executor::block_on;
use futures::future::join_all;

use crate::backend::{ParseOptions, ParserBackend};
use crate::fragments::{ContentFamily, Fragment, has_entry_point, precheck};
use crate::rule::{DiagnosticKind, ReportFn, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    Basic,
    Immediate,
    Full,
}

pub struct Validator<'a> {
    family: &'a ContentFamily,
    backend: &'a dyn ParserBackend,
    rule_name: &'static str,
}

impl<'a> Validator<'a> {
    pub fn new(family: &'a ContentFamily, backend: &'a dyn ParserBackend, rule_name: &'static str) -> Self {
        Self {
            family,
            backend,
            rule_name,
        }
    }

    pub async fn run(&self, fragments: &[Fragment], mode: ValidationMode, options: ParseOptions, report: ReportFn<'_>) {
        match mode {
            ValidationMode::Basic => self.run_basic(fragments, report),
            ValidationMode::Immediate => self.run_immediate(fragments, options, report),
            ValidationMode::Full => self.run_full(fragments, options, report).await,
        }
    }

    /// Cheap structural validation; the backend is never invoked.
    pub fn run_basic(&self, fragments: &[Fragment], report: ReportFn<'_>) {
        for fragment in fragments {
            let fragment = match precheck(fragment, self.family) {
                Ok(fragment) => fragment,
                Err(error) => {
                    report(error.with_rule(self.rule_name));
                    continue;
                }
            };

            if !self.family.checks_entry_point {
                continue;
            }
            if let Err(line) = has_entry_point(&fragment.code, self.family) {
                report(
                    ValidationError::new(
                        fragment.absolute_line(line),
                        &format!("Missing {} declaration", self.family.display_name),
                        Some("Start the block with a diagram type keyword such as \"flowchart LR\" or \"sequenceDiagram\""),
                        None,
                        DiagnosticKind::MissingEntryPoint,
                    )
                    .with_rule(self.rule_name),
                );
            }
        }
    }

    /// Sequential validation for backends that complete without suspending.
    pub fn run_immediate(&self, fragments: &[Fragment], options: ParseOptions, report: ReportFn<'_>) {
        for fragment in fragments {
            if let Some(error) = block_on(self.validate(fragment, options)) {
                report(error);
            }
        }
    }

    /// Fan out over all fragments, join, then report in fragment order.
    pub async fn run_full(&self, fragments: &[Fragment], options: ParseOptions, report: ReportFn<'_>) {
        let outcomes = join_all(fragments.iter().map(|fragment| self.validate(fragment, options))).await;
        for error in outcomes.into_iter().flatten() {
            report(error);
        }
    }

    async fn validate(&self, fragment: &Fragment, options: ParseOptions) -> Option<ValidationError> {
        let fragment = match precheck(fragment, self.family) {
            Ok(fragment) => fragment,
            Err(error) => return Some(error.with_rule(self.rule_name)),
        };

        log::debug!(
            "{}: parsing fragment at line {} with {}",
            self.rule_name,
            fragment.start_line,
            self.backend.name()
        );

        match self.backend.parse(&fragment.code, options).await {
            Ok(()) => None,
            Err(failure) => {
                log::debug!("{}: parser failure: {}", self.rule_name, failure.raw_message);
                let diagnostic = self.backend.translate(&failure, &fragment.code);
                Some(diagnostic.into_validation_error(&fragment).with_rule(self.rule_name))
            }
        }
    }
}
