// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dynamically typed setting values.
//!
//! This module provides the `Value` type, the payload every setting holds. Sources
//! produce values, update strategies combine them and validators inspect them.

use crate::domain::errors::{Result, SettingsError};
use crate::domain::settings::Settings;
use std::collections::BTreeMap;
use uuid::Uuid;

/// A setting value.
///
/// `Value` is a closed set of the kinds a setting can hold. [`Value::Undefined`]
/// marks a setting without a default and is distinct from [`Value::None`], which
/// is an explicit null. A nested settings container is itself a value.
///
/// # Examples
///
/// ```
/// use hexsettings::domain::Value;
///
/// let port = Value::from(8080);
/// assert_eq!(port.as_int(), Some(8080));
/// assert_eq!(port.kind(), "int");
/// assert!(Value::Undefined.is_undefined());
/// assert!(!Value::None.is_undefined());
/// ```
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    /// No value has been set.
    #[default]
    Undefined,
    /// An explicit null.
    None,
    /// A boolean.
    Bool(bool),
    /// An integer.
    Int(i64),
    /// A floating point number.
    Float(f64),
    /// A complex number.
    Complex {
        /// Real part
        re: f64,
        /// Imaginary part
        im: f64,
    },
    /// A mutable sequence.
    List(Vec<Value>),
    /// An immutable sequence.
    Tuple(Vec<Value>),
    /// An integer range.
    Range {
        /// First value
        start: i64,
        /// Exclusive upper bound
        stop: i64,
        /// Step between values
        step: i64,
    },
    /// Raw bytes.
    Bytes(Vec<u8>),
    /// A string.
    Str(String),
    /// An immutable set.
    FrozenSet(Vec<Value>),
    /// A mutable set.
    Set(Vec<Value>),
    /// A string-keyed mapping.
    Map(BTreeMap<String, Value>),
    /// A UUID.
    Uuid(Uuid),
    /// A nested settings container.
    Settings(Box<Settings>),
}

impl Value {
    /// Returns the name of the value kind, as used in validation messages.
    pub fn kind(&self) -> &str {
        match self {
            Value::Undefined => "Undefined",
            Value::None => "None",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Complex { .. } => "complex",
            Value::List(_) => "list",
            Value::Tuple(_) => "tuple",
            Value::Range { .. } => "range",
            Value::Bytes(_) => "bytes",
            Value::Str(_) => "str",
            Value::FrozenSet(_) => "frozenset",
            Value::Set(_) => "set",
            Value::Map(_) => "dict",
            Value::Uuid(_) => "UUID",
            Value::Settings(settings) => settings.type_name(),
        }
    }

    /// Returns `true` if this is the `Undefined` marker.
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// Returns the boolean, if this is a `Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the integer, if this is an `Int`.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the number as `f64`, if this is a `Float` or an `Int`.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(n) => Some(*n),
            Value::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    /// Returns the string slice, if this is a `Str`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the UUID, if this is a `Uuid`.
    pub fn as_uuid(&self) -> Option<Uuid> {
        match self {
            Value::Uuid(id) => Some(*id),
            _ => None,
        }
    }

    /// Returns the items, if this is a `List` or a `Tuple`.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) | Value::Tuple(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the mapping, if this is a `Map`.
    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the nested settings, if this is a `Settings` value.
    pub fn as_settings(&self) -> Option<&Settings> {
        match self {
            Value::Settings(settings) => Some(settings),
            _ => None,
        }
    }

    /// Returns the nested settings mutably, if this is a `Settings` value.
    pub fn as_settings_mut(&mut self) -> Option<&mut Settings> {
        match self {
            Value::Settings(settings) => Some(settings),
            _ => None,
        }
    }

    /// Concatenates two values with the semantics of `+`.
    ///
    /// Strings, lists, tuples and bytes are joined; numbers are added. Any other
    /// combination is an [`SettingsError::IncompatibleValues`] error.
    ///
    /// # Examples
    ///
    /// ```
    /// use hexsettings::domain::Value;
    ///
    /// let joined = Value::from(vec![1, 2]).concat(Value::from(vec![3, 4])).unwrap();
    /// assert_eq!(joined, Value::from(vec![1, 2, 3, 4]));
    /// ```
    pub fn concat(self, other: Value) -> Result<Value> {
        let incompatible = |left: &Value, right: &Value| SettingsError::IncompatibleValues {
            operation: "concatenate",
            left: left.kind().to_string(),
            right: right.kind().to_string(),
        };

        match (self, other) {
            (Value::Str(mut a), Value::Str(b)) => {
                a.push_str(&b);
                Ok(Value::Str(a))
            }
            (Value::List(mut a), Value::List(b)) => {
                a.extend(b);
                Ok(Value::List(a))
            }
            (Value::Tuple(mut a), Value::Tuple(b)) => {
                a.extend(b);
                Ok(Value::Tuple(a))
            }
            (Value::Bytes(mut a), Value::Bytes(b)) => {
                a.extend(b);
                Ok(Value::Bytes(a))
            }
            (Value::Int(a), Value::Int(b)) => a
                .checked_add(b)
                .map(Value::Int)
                .ok_or_else(|| incompatible(&Value::Int(a), &Value::Int(b))),
            (Value::Float(a), Value::Float(b)) => Ok(Value::Float(a + b)),
            (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => {
                Ok(Value::Float(a as f64 + b))
            }
            (Value::Complex { re: r1, im: i1 }, Value::Complex { re: r2, im: i2 }) => {
                Ok(Value::Complex {
                    re: r1 + r2,
                    im: i1 + i2,
                })
            }
            (a, b) => Err(incompatible(&a, &b)),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(i64::from(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<u16> for Value {
    fn from(n: u16) -> Self {
        Value::Int(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::None, Into::into)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Value::Map(map)
    }
}

impl From<Uuid> for Value {
    fn from(id: Uuid) -> Self {
        Value::Uuid(id)
    }
}

impl From<Settings> for Value {
    fn from(settings: Settings) -> Self {
        Value::Settings(Box::new(settings))
    }
}
