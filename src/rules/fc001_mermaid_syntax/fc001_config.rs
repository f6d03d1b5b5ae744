use crate::rule_config_serde::RuleConfig;
use serde::{Deserialize, Serialize};

/// Configuration for FC001 (Mermaid syntax)
///
/// `basic` is read by the host into [`crate::config::RuleOptions`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default, rename_all = "kebab-case")]
pub struct FC001Config {
    /// Parse tool and its arguments; empty means the built-in `mermaid-parse`
    pub command: Vec<String>,
}

impl RuleConfig for FC001Config {
    const RULE_NAME: &'static str = "mermaid-syntax";
}
