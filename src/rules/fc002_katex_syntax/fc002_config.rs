use crate::rule_config_serde::RuleConfig;
use serde::{Deserialize, Serialize};

/// Configuration for FC002 (KaTeX syntax)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default, rename_all = "kebab-case")]
pub struct FC002Config {
    /// Parse tool and its arguments; empty means the built-in `katex-parse`
    pub command: Vec<String>,
}

impl RuleConfig for FC002Config {
    const RULE_NAME: &'static str = "katex-syntax";
}
