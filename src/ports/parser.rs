// SPDX-License-Identifier: MIT OR Apache-2.0

//! Settings file parser trait definition.
//!
//! This module defines the `ConfigParser` trait, which provides an interface for
//! parsing settings files in different formats (JSON, YAML, Python-style scripts).

use crate::domain::{Result, Value};

/// A trait for parsing settings files.
///
/// A parser turns the raw content of a file into a [`Value::Map`] whose keys are the
/// top-level names of the file. Nested mappings are kept nested; a file source walks
/// them with the names of the enclosing nested settings fields.
///
/// # Examples
///
/// ```rust
/// use hexsettings::domain::{Result, Value};
/// use hexsettings::ports::ConfigParser;
/// use std::collections::BTreeMap;
///
/// struct KeyValueParser;
///
/// impl ConfigParser for KeyValueParser {
///     fn parse(&self, content: &str) -> Result<Value> {
///         let map: BTreeMap<String, Value> = content
///             .lines()
///             .filter_map(|line| line.split_once('='))
///             .map(|(k, v)| (k.trim().to_string(), Value::from(v.trim())))
///             .collect();
///         Ok(Value::Map(map))
///     }
///
///     fn supported_extensions(&self) -> &[&str] {
///         &["kv"]
///     }
/// }
///
/// let parsed = KeyValueParser.parse("HOST = localhost").unwrap();
/// assert_eq!(parsed.as_map().unwrap().get("HOST"), Some(&Value::from("localhost")));
/// ```
pub trait ConfigParser: Send + Sync {
    /// Parses file content into a mapping of top-level names to values.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::ParseError`](crate::domain::SettingsError::ParseError)
    /// if the content is malformed or its top level is not a mapping.
    fn parse(&self, content: &str) -> Result<Value>;

    /// Returns the file extensions supported by this parser.
    ///
    /// Extensions are given without the leading dot.
    fn supported_extensions(&self) -> &[&str];

    /// Returns `true` if the parser supports the extension, ignoring ASCII case.
    fn supports_extension(&self, extension: &str) -> bool {
        self.supported_extensions()
            .iter()
            .any(|e| e.eq_ignore_ascii_case(extension))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    struct TestParser;

    impl ConfigParser for TestParser {
        fn parse(&self, _content: &str) -> Result<Value> {
            let mut map = BTreeMap::new();
            map.insert("KEY".to_string(), Value::from("value"));
            Ok(Value::Map(map))
        }

        fn supported_extensions(&self) -> &[&str] {
            &["test", "tst"]
        }
    }

    #[test]
    fn test_parser_parse() {
        let parser = TestParser;
        let result = parser.parse("dummy content").unwrap();
        assert_eq!(result.as_map().map(BTreeMap::len), Some(1));
    }

    #[test]
    fn test_parser_supported_extensions() {
        let parser = TestParser;
        assert_eq!(parser.supported_extensions(), &["test", "tst"]);
        assert!(parser.supports_extension("TST"));
        assert!(!parser.supports_extension("json"));
    }
}
