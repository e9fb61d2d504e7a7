// SPDX-License-Identifier: MIT OR Apache-2.0

//! Structured validation results.
//!
//! Validation never stops at the first failure unless asked to. Instead, every
//! message is collected into a [`ValidationErrors`] map keyed by field name. A
//! nested settings container contributes its own map under the owning field, so
//! the structure mirrors the container nesting.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Key under which failures of the whole-object validation hook are recorded.
pub const INVALID_SETTINGS: &str = "__invalid__settings__";

/// One entry in the error list of a field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ErrorDetail {
    /// A message produced by a validator.
    Message(String),
    /// The errors of a nested settings container.
    Nested(ValidationErrors),
}

/// Aggregated validation errors, keyed by field name.
///
/// Serializes to the plain nested mapping shape:
///
/// ```
/// use hexsettings::domain::{ErrorDetail, ValidationErrors};
///
/// let mut inner = ValidationErrors::new();
/// inner.insert("HOST", ErrorDetail::Message("bad host".to_string()));
///
/// let mut outer = ValidationErrors::new();
/// outer.insert("DATABASE", ErrorDetail::Nested(inner));
///
/// let json = serde_json::to_string(&outer).unwrap();
/// assert_eq!(json, r#"{"DATABASE":[{"HOST":["bad host"]}]}"#);
/// assert_eq!(outer.messages(), vec!["DATABASE.HOST: bad host".to_string()]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<ErrorDetail>>);

impl ValidationErrors {
    /// Creates an empty error map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if no errors were recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of fields with errors.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns the errors recorded for a field.
    pub fn get(&self, name: &str) -> Option<&[ErrorDetail]> {
        self.0.get(name).map(Vec::as_slice)
    }

    /// Returns `true` if any errors were recorded for the field.
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Appends an error to the list of a field.
    pub fn insert(&mut self, name: impl Into<String>, detail: ErrorDetail) {
        self.0.entry(name.into()).or_default().push(detail);
    }

    /// Iterates over fields and their errors in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ErrorDetail])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Flattens the map into `path: message` lines.
    pub fn messages(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_messages("", &mut out);
        out
    }

    fn collect_messages(&self, prefix: &str, out: &mut Vec<String>) {
        for (name, details) in &self.0 {
            let path = if prefix.is_empty() {
                name.clone()
            } else {
                format!("{}.{}", prefix, name)
            };
            for detail in details {
                match detail {
                    ErrorDetail::Message(msg) => out.push(format!("{}: {}", path, msg)),
                    ErrorDetail::Nested(nested) => nested.collect_messages(&path, out),
                }
            }
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.messages().join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        let errors = ValidationErrors::new();
        assert!(errors.is_empty());
        assert_eq!(errors.len(), 0);
        assert!(errors.messages().is_empty());
        assert_eq!(serde_json::to_string(&errors).unwrap(), "{}");
    }

    #[test]
    fn test_insert_appends_to_field() {
        let mut errors = ValidationErrors::new();
        errors.insert("PORT", ErrorDetail::Message("first".to_string()));
        errors.insert("PORT", ErrorDetail::Message("second".to_string()));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("PORT").map(<[ErrorDetail]>::len), Some(2));
        assert!(errors.contains("PORT"));
        assert!(!errors.contains("HOST"));
    }

    #[test]
    fn test_three_level_shape() {
        let mut leaf = ValidationErrors::new();
        leaf.insert("T", ErrorDetail::Message("msg".to_string()));
        let mut middle = ValidationErrors::new();
        middle.insert("NESTED_S3", ErrorDetail::Nested(leaf));
        let mut top = ValidationErrors::new();
        top.insert("NESTED_S2", ErrorDetail::Nested(middle));

        let json = serde_json::to_value(&top).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"NESTED_S2": [{"NESTED_S3": [{"T": ["msg"]}]}]})
        );
        assert_eq!(top.to_string(), "NESTED_S2.NESTED_S3.T: msg");
    }
}
