// SPDX-License-Identifier: MIT OR Apache-2.0

//! YAML settings file parser.

use crate::domain::{Result, SettingsError, Value};
use crate::ports::ConfigParser;
use std::collections::BTreeMap;

/// YAML parser implementation.
///
/// Mappings become [`Value::Map`], sequences become [`Value::List`] and `null`
/// becomes [`Value::None`]. Scalar mapping keys are turned into strings; other keys
/// are skipped. Tags are ignored.
///
/// # Examples
///
/// ```rust
/// use hexsettings::adapters::YamlParser;
/// use hexsettings::domain::Value;
/// use hexsettings::ports::ConfigParser;
///
/// let parser = YamlParser::new();
/// let yaml_content = "DB:\n  HOST: localhost\n  PORT: 5432";
/// let result = parser.parse(yaml_content).unwrap();
/// let db = result.as_map().unwrap()["DB"].as_map().unwrap();
/// assert_eq!(db["HOST"], Value::from("localhost"));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlParser;

impl YamlParser {
    /// Creates a new YAML parser.
    pub fn new() -> Self {
        YamlParser
    }

    fn convert(value: serde_yaml::Value) -> Value {
        match value {
            serde_yaml::Value::Null => Value::None,
            serde_yaml::Value::Bool(b) => Value::Bool(b),
            serde_yaml::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_yaml::Value::String(s) => Value::Str(s),
            serde_yaml::Value::Sequence(seq) => {
                Value::List(seq.into_iter().map(Self::convert).collect())
            }
            serde_yaml::Value::Mapping(map) => {
                let mut result = BTreeMap::new();
                for (key, val) in map {
                    match Self::key_string(&key) {
                        Some(key) => {
                            result.insert(key, Self::convert(val));
                        }
                        None => tracing::debug!("Skipping YAML mapping entry with a non-scalar key"),
                    }
                }
                Value::Map(result)
            }
            serde_yaml::Value::Tagged(tagged) => Self::convert(tagged.value),
        }
    }

    fn key_string(key: &serde_yaml::Value) -> Option<String> {
        match key {
            serde_yaml::Value::String(s) => Some(s.clone()),
            serde_yaml::Value::Number(n) => Some(n.to_string()),
            serde_yaml::Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

impl ConfigParser for YamlParser {
    fn parse(&self, content: &str) -> Result<Value> {
        let value: serde_yaml::Value =
            serde_yaml::from_str(content).map_err(|e| SettingsError::ParseError {
                message: format!("Failed to parse YAML: {}", e),
                source: Some(Box::new(e)),
            })?;

        Ok(Self::convert(value))
    }

    fn supported_extensions(&self) -> &[&str] {
        &["yaml", "yml"]
    }
}
