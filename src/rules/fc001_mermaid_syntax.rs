use futures::FutureExt;
use futures::future::BoxFuture;
use std::sync::Arc;

use crate::backend::{MermaidBackend, ParserBackend};
use crate::fragments::{FragmentExtractor, MERMAID};
use crate::rule::{ReportFn, Rule, RuleParams};
use crate::rule_config_serde::RuleConfig;
use crate::validation::{ValidationMode, Validator};

mod fc001_config;
use fc001_config::FC001Config;

/// Rule FC001: Mermaid diagrams must parse
///
/// Every fenced `mermaid` block and every HTML element classed `mermaid` is
/// handed to the Mermaid parser. Fragments are validated concurrently and the
/// failures reported together, in document order.
#[derive(Clone)]
pub struct FC001MermaidSyntax {
    config: FC001Config,
    extractor: FragmentExtractor,
    backend: Arc<dyn ParserBackend>,
}

impl Default for FC001MermaidSyntax {
    fn default() -> Self {
        Self::new()
    }
}

impl FC001MermaidSyntax {
    pub fn new() -> Self {
        Self::from_config_struct(FC001Config::default())
    }

    pub fn from_config_struct(config: FC001Config) -> Self {
        let backend = Arc::new(MermaidBackend::new(config.command.clone()));
        Self {
            config,
            extractor: FragmentExtractor::new(MERMAID),
            backend,
        }
    }

    /// Same rule, validating through another parser
    pub fn with_backend(backend: Arc<dyn ParserBackend>) -> Self {
        Self {
            config: FC001Config::default(),
            extractor: FragmentExtractor::new(MERMAID),
            backend,
        }
    }

    pub fn config(&self) -> &FC001Config {
        &self.config
    }
}

impl Rule for FC001MermaidSyntax {
    fn names(&self) -> &'static [&'static str] {
        &["FC001", FC001Config::RULE_NAME]
    }

    fn description(&self) -> &'static str {
        "Mermaid diagrams should be syntactically valid"
    }

    fn tags(&self) -> &'static [&'static str] {
        &["mermaid", "diagrams"]
    }

    fn is_async(&self) -> bool {
        true
    }

    fn check<'a>(&'a self, params: RuleParams<'a>, report: ReportFn<'a>) -> BoxFuture<'a, ()> {
        async move {
            let fragments = self.extractor.extract(params.tokens);
            if fragments.is_empty() {
                return;
            }

            let mode = if params.config.basic {
                ValidationMode::Basic
            } else {
                ValidationMode::Full
            };
            log::debug!("{}: {} fragment(s) in {:?} mode", self.name(), fragments.len(), mode);

            Validator::new(self.extractor.family(), self.backend.as_ref(), self.name())
                .run(&fragments, mode, params.config.into(), report)
                .await;
        }
        .boxed()
    }

    fn from_config(config: &crate::config::Config) -> Box<dyn Rule>
    where
        Self: Sized,
    {
        let rule_config = crate::rule_config_serde::load_rule_config::<FC001Config>(config);
        Box::new(Self::from_config_struct(rule_config))
    }
}
