// SPDX-License-Identifier: MIT OR Apache-2.0

//! Type descriptors for settings.
//!
//! A [`TypeHint`] describes which values a setting accepts. Hints are either
//! declared explicitly or guessed from the default value when the settings type
//! is built.

use crate::domain::value::Value;
use std::fmt;

/// A type descriptor attached to a setting.
///
/// # Examples
///
/// ```
/// use hexsettings::domain::{TypeHint, Value};
///
/// assert_eq!(TypeHint::guess(&Value::from(true)), TypeHint::Bool);
/// assert!(TypeHint::Float.accepts(&Value::from(1)));
/// assert!(!TypeHint::Int.accepts(&Value::from("1")));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeHint {
    /// Infer the hint from the declaration; resolved when the type is built.
    Infer,
    /// Any value is accepted.
    Any,
    /// Only `None`.
    NoneType,
    /// A boolean.
    Bool,
    /// An integer.
    Int,
    /// A float; integers are accepted too.
    Float,
    /// A complex number; integers and floats are accepted too.
    Complex,
    /// A list with arbitrary items.
    List,
    /// A tuple with arbitrary items.
    Tuple,
    /// An integer range.
    Range,
    /// Raw bytes.
    Bytes,
    /// A string.
    Str,
    /// An immutable set.
    FrozenSet,
    /// A mutable set.
    Set,
    /// A mapping with arbitrary values.
    Map,
    /// A UUID.
    Uuid,
    /// The inner hint or `None`.
    Optional(Box<TypeHint>),
    /// A list whose items all match the inner hint.
    ListOf(Box<TypeHint>),
    /// A mapping whose values all match the inner hint.
    MapOf(Box<TypeHint>),
    /// Any of the listed hints.
    Union(Vec<TypeHint>),
    /// A nested settings container of the named type or a type derived from it.
    Settings(String),
}

impl TypeHint {
    /// Guesses a hint from a value.
    ///
    /// Kinds are checked in a fixed priority order with booleans before integers.
    /// `Undefined`, `None` and anything unrecognised guess [`TypeHint::Any`].
    pub fn guess(value: &Value) -> TypeHint {
        match value {
            Value::Bool(_) => TypeHint::Bool,
            Value::Int(_) => TypeHint::Int,
            Value::Float(_) => TypeHint::Float,
            Value::Complex { .. } => TypeHint::Complex,
            Value::List(_) => TypeHint::List,
            Value::Tuple(_) => TypeHint::Tuple,
            Value::Range { .. } => TypeHint::Range,
            Value::Bytes(_) => TypeHint::Bytes,
            Value::Str(_) => TypeHint::Str,
            Value::FrozenSet(_) => TypeHint::FrozenSet,
            Value::Set(_) => TypeHint::Set,
            Value::Map(_) => TypeHint::Map,
            Value::Uuid(_) => TypeHint::Uuid,
            Value::Settings(settings) => TypeHint::Settings(settings.type_name().to_string()),
            Value::Undefined | Value::None => TypeHint::Any,
        }
    }

    /// Returns `true` if the value conforms to this hint.
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (TypeHint::Any | TypeHint::Infer, _) => true,
            (TypeHint::NoneType, Value::None) => true,
            (TypeHint::Bool, Value::Bool(_)) => true,
            (TypeHint::Int, Value::Int(_)) => true,
            (TypeHint::Float, Value::Float(_) | Value::Int(_)) => true,
            (TypeHint::Complex, Value::Complex { .. } | Value::Float(_) | Value::Int(_)) => true,
            (TypeHint::List, Value::List(_)) => true,
            (TypeHint::Tuple, Value::Tuple(_)) => true,
            (TypeHint::Range, Value::Range { .. }) => true,
            (TypeHint::Bytes, Value::Bytes(_)) => true,
            (TypeHint::Str, Value::Str(_)) => true,
            (TypeHint::FrozenSet, Value::FrozenSet(_)) => true,
            (TypeHint::Set, Value::Set(_)) => true,
            (TypeHint::Map, Value::Map(_)) => true,
            (TypeHint::Uuid, Value::Uuid(_)) => true,
            (TypeHint::Optional(_), Value::None) => true,
            (TypeHint::Optional(inner), v) => inner.accepts(v),
            (TypeHint::ListOf(inner), Value::List(items)) => items.iter().all(|i| inner.accepts(i)),
            (TypeHint::MapOf(inner), Value::Map(map)) => map.values().all(|v| inner.accepts(v)),
            (TypeHint::Union(hints), v) => hints.iter().any(|h| h.accepts(v)),
            (TypeHint::Settings(name), Value::Settings(settings)) => {
                settings.settings_type().is_a(name)
            }
            _ => false,
        }
    }

    /// Convenience constructor for [`TypeHint::Optional`].
    pub fn optional(inner: TypeHint) -> TypeHint {
        TypeHint::Optional(Box::new(inner))
    }

    /// Convenience constructor for [`TypeHint::ListOf`].
    pub fn list_of(inner: TypeHint) -> TypeHint {
        TypeHint::ListOf(Box::new(inner))
    }

    /// Convenience constructor for [`TypeHint::MapOf`].
    pub fn map_of(inner: TypeHint) -> TypeHint {
        TypeHint::MapOf(Box::new(inner))
    }
}

impl fmt::Display for TypeHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeHint::Infer => write!(f, "<infer>"),
            TypeHint::Any => write!(f, "Any"),
            TypeHint::NoneType => write!(f, "None"),
            TypeHint::Bool => write!(f, "bool"),
            TypeHint::Int => write!(f, "int"),
            TypeHint::Float => write!(f, "float"),
            TypeHint::Complex => write!(f, "complex"),
            TypeHint::List => write!(f, "list"),
            TypeHint::Tuple => write!(f, "tuple"),
            TypeHint::Range => write!(f, "range"),
            TypeHint::Bytes => write!(f, "bytes"),
            TypeHint::Str => write!(f, "str"),
            TypeHint::FrozenSet => write!(f, "frozenset"),
            TypeHint::Set => write!(f, "set"),
            TypeHint::Map => write!(f, "dict"),
            TypeHint::Uuid => write!(f, "UUID"),
            TypeHint::Optional(inner) => write!(f, "Optional[{}]", inner),
            TypeHint::ListOf(inner) => write!(f, "list[{}]", inner),
            TypeHint::MapOf(inner) => write!(f, "dict[str, {}]", inner),
            TypeHint::Union(hints) => {
                let names: Vec<String> = hints.iter().map(ToString::to_string).collect();
                write!(f, "Union[{}]", names.join(", "))
            }
            TypeHint::Settings(name) => write!(f, "{}", name),
        }
    }
}
