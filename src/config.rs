//!
//! This module defines configuration structures and loading logic for fragcheck.
//! Configuration lives in `.fragcheck.toml`: a `[global]` table plus one table per rule,
//! keyed by the rule's kebab-case name.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

/// File looked up in the working directory when no `--config` is given
pub const DEFAULT_CONFIG_FILE: &str = ".fragcheck.toml";

/// Normalizes configuration keys (rule names, option names) to lowercase kebab-case.
pub fn normalize_key(key: &str) -> String {
    key.trim().replace('_', "-").to_ascii_lowercase()
}

/// Represents a rule-specific configuration table
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Clone)]
pub struct RuleConfig {
    /// Configuration values for the rule
    #[serde(flatten)]
    pub values: BTreeMap<String, toml::Value>,
}

/// Represents the complete configuration loaded from .fragcheck.toml
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Clone)]
pub struct Config {
    /// Global configuration options
    #[serde(default)]
    pub global: GlobalConfig,

    /// Rule-specific configurations
    #[serde(flatten)]
    pub rules: BTreeMap<String, RuleConfig>,
}

/// Global configuration options
#[derive(Debug, Serialize, Deserialize, PartialEq, Default, Clone)]
#[serde(default, rename_all = "kebab-case")]
pub struct GlobalConfig {
    /// Rules to run exclusively (empty = all)
    pub enable: Vec<String>,

    /// Disabled rules
    pub disable: Vec<String>,

    /// Glob patterns of files and directories to skip while walking
    pub exclude: Vec<String>,

    /// Force basic mode for every rule
    pub basic: bool,
}

/// Options a rule receives from the host on every run.
///
/// Unset fields default to `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RuleOptions {
    /// Skip the parser and only run the cheap structural checks
    pub basic: bool,
    /// Forwarded to the structured backend
    #[serde(alias = "displayMode", alias = "display_mode")]
    pub display_mode: bool,
    /// Forwarded to the structured backend
    pub strict: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    IoError { source: io::Error, path: String },

    #[error("Failed to parse config file {path}: {message}")]
    ParseError { path: String, message: String },

    #[error("Configuration file already exists: {path}")]
    FileExists { path: String },
}

impl Config {
    /// Load the configuration from `path`, or from `.fragcheck.toml` when present.
    ///
    /// A missing default file yields the default configuration; a missing explicit
    /// file is an error.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::from_file(DEFAULT_CONFIG_FILE),
            None => {
                log::debug!("No {DEFAULT_CONFIG_FILE} found, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::IoError {
            source,
            path: path.to_string(),
        })?;
        let config = Self::from_toml_str(&content).map_err(|message| ConfigError::ParseError {
            path: path.to_string(),
            message,
        })?;
        log::debug!("Loaded configuration from {path}");
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, String> {
        let raw: Config = toml::from_str(content).map_err(|e| e.to_string())?;
        // Rule tables are addressed case-insensitively and with either separator
        let rules = raw
            .rules
            .into_iter()
            .map(|(name, section)| {
                let values = section
                    .values
                    .into_iter()
                    .map(|(key, value)| (normalize_key(&key), value))
                    .collect();
                (normalize_key(&name), RuleConfig { values })
            })
            .collect();
        Ok(Self {
            global: raw.global,
            rules,
        })
    }

    /// Whether a rule with the given names should run under this configuration
    pub fn is_rule_enabled(&self, names: &[&str]) -> bool {
        let named = |list: &[String]| {
            list.iter()
                .any(|entry| names.iter().any(|name| normalize_key(entry) == normalize_key(name)))
        };
        if !self.global.enable.is_empty() && !named(&self.global.enable) {
            return false;
        }
        !named(&self.global.disable)
    }

    /// Host-visible options for a rule: its own table, with `global.basic` forcing basic mode
    pub fn rule_options(&self, names: &[&str]) -> RuleOptions {
        let section = names.iter().find_map(|name| self.rules.get(&normalize_key(name)));
        let mut options = match section {
            Some(section) => {
                let table: toml::Table = section.values.clone().into_iter().collect();
                toml::Value::Table(table).try_into().unwrap_or_else(|e| {
                    log::warn!("Invalid options for rule {}: {e}; using defaults", names.first().unwrap_or(&"?"));
                    RuleOptions::default()
                })
            }
            None => RuleOptions::default(),
        };
        options.basic |= self.global.basic;
        options
    }
}

/// Create a default configuration file at the specified path
pub fn create_default_config(path: &str) -> Result<(), ConfigError> {
    if Path::new(path).exists() {
        return Err(ConfigError::FileExists {
            path: path.to_string(),
        });
    }

    let default_config = r#"# fragcheck configuration file

[global]
# Rules to disable, by code or name
# disable = ["FC002"]

# Glob patterns to skip when walking directories
# exclude = ["node_modules", "vendor"]

# Only run the cheap structural checks, never the external parsers
# basic = false

[mermaid-syntax]
# basic = false
command = ["mermaid-parse"]

[katex-syntax]
# basic = false
display-mode = false
strict = false
command = ["katex-parse"]
"#;

    fs::write(path, default_config).map_err(|source| ConfigError::IoError {
        source,
        path: path.to_string(),
    })
}
