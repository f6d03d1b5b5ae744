/// Serde-based configuration for rules
///
/// Each rule owns a typed config struct; the raw TOML table from the global
/// config is converted to JSON and deserialized into it.
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Trait for rule configurations
pub trait RuleConfig: Serialize + DeserializeOwned + Default + Clone {
    /// The config table name (e.g., "mermaid-syntax")
    const RULE_NAME: &'static str;
}

/// Helper to load rule configuration from the global config
pub fn load_rule_config<T: RuleConfig>(config: &crate::config::Config) -> T {
    let Some(rule_config) = config.rules.get(T::RULE_NAME) else {
        return T::default();
    };

    let json_map: serde_json::Map<String, serde_json::Value> = rule_config
        .values
        .iter()
        .filter_map(|(k, v)| toml_value_to_json(v).map(|json_v| (k.clone(), json_v)))
        .collect();

    match serde_json::from_value(serde_json::Value::Object(json_map)) {
        Ok(parsed) => parsed,
        Err(e) => {
            log::warn!("Invalid configuration for [{}]: {e}; using defaults", T::RULE_NAME);
            T::default()
        }
    }
}

/// Convert TOML value to JSON value for serde deserialization
fn toml_value_to_json(toml_val: &toml::Value) -> Option<serde_json::Value> {
    match toml_val {
        toml::Value::String(s) => Some(serde_json::Value::String(s.clone())),
        toml::Value::Integer(i) => Some(serde_json::Value::Number((*i).into())),
        toml::Value::Float(f) => serde_json::Number::from_f64(*f).map(serde_json::Value::Number),
        toml::Value::Boolean(b) => Some(serde_json::Value::Bool(*b)),
        toml::Value::Array(arr) => {
            let json_arr: Vec<_> = arr.iter().filter_map(toml_value_to_json).collect();
            Some(serde_json::Value::Array(json_arr))
        }
        toml::Value::Table(table) => {
            let json_map: serde_json::Map<_, _> = table
                .iter()
                .filter_map(|(k, v)| toml_value_to_json(v).map(|json_v| (k.clone(), json_v)))
                .collect();
            Some(serde_json::Value::Object(json_map))
        }
        toml::Value::Datetime(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use serde::Deserialize;

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    #[serde(default, rename_all = "kebab-case")]
    struct SampleConfig {
        basic: bool,
        command: Vec<String>,
        max_width: u64,
    }

    impl RuleConfig for SampleConfig {
        const RULE_NAME: &'static str = "sample-rule";
    }

    #[test]
    fn test_load_present_section() {
        let config = Config::from_toml_str(
            r#"
[sample-rule]
basic = true
command = ["tool", "--flag"]
max-width = 500
"#,
        )
        .unwrap();
        let loaded: SampleConfig = load_rule_config(&config);
        assert!(loaded.basic);
        assert_eq!(loaded.command, vec!["tool", "--flag"]);
        assert_eq!(loaded.max_width, 500);
    }

    #[test]
    fn test_missing_section_uses_default() {
        let loaded: SampleConfig = load_rule_config(&Config::default());
        assert_eq!(loaded, SampleConfig::default());
    }

    #[test]
    fn test_invalid_section_uses_default() {
        let config = Config::from_toml_str("[sample-rule]\nbasic = \"yes\"\n").unwrap();
        let loaded: SampleConfig = load_rule_config(&config);
        assert_eq!(loaded, SampleConfig::default());
    }
}
