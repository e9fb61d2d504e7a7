// SPDX-License-Identifier: MIT OR Apache-2.0

//! String coercion for text-based sources.
//!
//! Environment variables and command-line arguments only carry strings. They are
//! converted according to the type hint of the setting being read; a string that does
//! not convert is kept as is, so validation can report the mismatch.

use crate::domain::{TypeHint, Value};

/// Converts a raw string according to a type hint.
///
/// `int`, `float` and `bool` hints are converted; booleans accept `true`, `yes`, `1`,
/// `on` and `false`, `no`, `0`, `off` in any case. `Optional` and `Union` hints try
/// their members in order. Everything else stays a string.
///
/// # Examples
///
/// ```
/// use hexsettings::adapters::convert::convert_str;
/// use hexsettings::domain::{TypeHint, Value};
///
/// assert_eq!(convert_str("8080", &TypeHint::Int), Value::Int(8080));
/// assert_eq!(convert_str("Yes", &TypeHint::Bool), Value::Bool(true));
/// assert_eq!(convert_str("notanint", &TypeHint::Int), Value::from("notanint"));
/// ```
pub fn convert_str(raw: &str, type_hint: &TypeHint) -> Value {
    try_convert(raw, type_hint).unwrap_or_else(|| Value::Str(raw.to_string()))
}

fn try_convert(raw: &str, type_hint: &TypeHint) -> Option<Value> {
    match type_hint {
        TypeHint::Int => raw.trim().parse::<i64>().ok().map(Value::Int),
        TypeHint::Float => raw.trim().parse::<f64>().ok().map(Value::Float),
        TypeHint::Bool => parse_bool(raw).map(Value::Bool),
        TypeHint::Optional(inner) => try_convert(raw, inner),
        TypeHint::Union(members) => members.iter().find_map(|m| try_convert(raw, m)),
        _ => None,
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Some(true),
        "false" | "no" | "0" | "off" => Some(false),
        _ => None,
    }
}
