mod fc001_mermaid_syntax;
mod fc002_katex_syntax;

pub use fc001_mermaid_syntax::FC001MermaidSyntax;
pub use fc002_katex_syntax::FC002KatexSyntax;

use crate::rule::Rule;

/// Returns every rule, configured from `config`, regardless of enablement
pub fn all_rules(config: &crate::config::Config) -> Vec<Box<dyn Rule>> {
    macro_rules! rule {
        ($ctor:ident) => {
            $ctor::from_config(config)
        };
    }
    vec![rule!(FC001MermaidSyntax), rule!(FC002KatexSyntax)]
}

/// The rules that should run under `config`
pub fn enabled_rules(config: &crate::config::Config) -> Vec<Box<dyn Rule>> {
    all_rules(config)
        .into_iter()
        .filter(|rule| config.is_rule_enabled(rule.names()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_all_rules_have_unique_names() {
        let rules = all_rules(&Config::default());
        assert_eq!(rules.len(), 2);
        assert_ne!(rules[0].name(), rules[1].name());
    }

    #[test]
    fn test_enabled_rules_respects_disable_by_alias() {
        let config = Config::from_toml_str("[global]\ndisable = [\"katex-syntax\"]\n").unwrap();
        let names: Vec<_> = enabled_rules(&config).iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["FC001"]);
    }

    #[test]
    fn test_enabled_rules_respects_enable() {
        let config = Config::from_toml_str("[global]\nenable = [\"fc002\"]\n").unwrap();
        let names: Vec<_> = enabled_rules(&config).iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["FC002"]);
    }
}
