// SPDX-License-Identifier: MIT OR Apache-2.0

//! JSON settings file parser.

use crate::domain::{Result, SettingsError, Value};
use crate::ports::ConfigParser;

/// JSON parser implementation.
///
/// Objects become [`Value::Map`], arrays become [`Value::List`] and `null` becomes
/// [`Value::None`]. Integers that fit in an `i64` stay integers; other numbers become
/// floats.
///
/// # Examples
///
/// ```rust
/// use hexsettings::adapters::JsonParser;
/// use hexsettings::domain::Value;
/// use hexsettings::ports::ConfigParser;
///
/// let parser = JsonParser::new();
/// let parsed = parser.parse(r#"{"DB": {"PORT": 5432}}"#).unwrap();
/// let db = parsed.as_map().unwrap()["DB"].as_map().unwrap();
/// assert_eq!(db["PORT"], Value::Int(5432));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonParser;

impl JsonParser {
    /// Creates a new JSON parser.
    pub fn new() -> Self {
        JsonParser
    }

    fn convert(value: serde_json::Value) -> Value {
        match value {
            serde_json::Value::Null => Value::None,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Self::convert).collect())
            }
            serde_json::Value::Object(map) => Value::Map(
                map.into_iter()
                    .map(|(key, val)| (key, Self::convert(val)))
                    .collect(),
            ),
        }
    }
}

impl ConfigParser for JsonParser {
    fn parse(&self, content: &str) -> Result<Value> {
        let value: serde_json::Value =
            serde_json::from_str(content).map_err(|e| SettingsError::ParseError {
                message: format!("Failed to parse JSON: {}", e),
                source: Some(Box::new(e)),
            })?;

        Ok(Self::convert(value))
    }

    fn supported_extensions(&self) -> &[&str] {
        &["json", "js"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::FileSource;
    use crate::domain::{Setting, TypeHint};
    use crate::ports::Source;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_json_parser_mixed_types() {
        let parser = JsonParser::new();
        let json = r#"{
            "STR": "hello",
            "INT": 42,
            "FLOAT": 1.5,
            "BIG": 18446744073709551615,
            "BOOL": true,
            "NULL": null,
            "LIST": [1, "two"]
        }"#;
        let result = parser.parse(json).unwrap();
        let map = result.as_map().unwrap();

        assert_eq!(map["STR"], Value::from("hello"));
        assert_eq!(map["INT"], Value::Int(42));
        assert_eq!(map["FLOAT"], Value::Float(1.5));
        assert!(matches!(map["BIG"], Value::Float(_)));
        assert_eq!(map["BOOL"], Value::Bool(true));
        assert_eq!(map["NULL"], Value::None);
        assert_eq!(
            map["LIST"],
            Value::List(vec![Value::Int(1), Value::from("two")])
        );
    }

    #[test]
    fn test_empty_json_file() {
        let temp_file = NamedTempFile::new().unwrap();
        let source = FileSource::from_file(temp_file.path(), JsonParser::new()).unwrap();
        assert!(source.data().is_empty());

        let source = FileSource::from_content("null", JsonParser::new()).unwrap();
        assert!(source.data().is_empty());
    }

    #[test]
    fn test_json_parser_invalid() {
        let parser = JsonParser::new();
        let err = parser.parse("{\"a\": ").unwrap_err();
        assert!(matches!(err, SettingsError::ParseError { .. }));
    }

    #[test]
    fn test_json_parser_supported_extensions() {
        let parser = JsonParser::new();
        assert!(parser.supports_extension("json"));
        assert!(parser.supports_extension("JS"));
        assert!(!parser.supports_extension("yaml"));
    }

    #[test]
    fn test_json_file_source() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, r#"{{"DB": {{"HOST": "localhost"}}}}"#).unwrap();

        let source = FileSource::from_file(temp_file.path(), JsonParser::new()).unwrap();
        let mut host = Setting::undefined().with_type_hint(TypeHint::Str);
        host.bind("HOST").unwrap();

        let value = source.read(&host, &["DB".to_string()]).unwrap();
        assert_eq!(value, Some(Value::from("localhost")));
    }
}
