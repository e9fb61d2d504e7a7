// SPDX-License-Identifier: MIT OR Apache-2.0

//! UUID settings.
//!
//! [`uuid_setting`] declares a setting holding a [`Uuid`]. Strings written to it are
//! parsed; a string that does not parse is stored as is and reported by
//! [`UuidValidator`] when the settings are validated.

use crate::domain::{Result, Setting, TypeHint, ValidationError, Value};
use crate::ports::{AccessContext, Behavior, ValidationContext, Validator};
use uuid::Uuid;

/// Declares a UUID setting with `value` as its default.
///
/// This is the setting the registry builds for plain values annotated with
/// [`TypeHint::Uuid`].
///
/// # Examples
///
/// ```
/// use hexsettings::adapters::uuid_setting;
/// use hexsettings::domain::{SettingsType, Value};
///
/// let ty = SettingsType::builder("App")
///     .setting("ID", uuid_setting(Value::Undefined))
///     .build()
///     .unwrap();
/// let mut settings = ty.instantiate().unwrap();
///
/// settings.set("ID", "77e7bb7b-6a44-4069-ba04-bc4835cb31e5").unwrap();
/// assert!(settings.get("ID").unwrap().as_uuid().is_some());
/// assert!(settings.is_valid());
/// ```
pub fn uuid_setting<V: Into<Value>>(value: V) -> Setting {
    Setting::new(parse_or_keep(value.into()))
        .with_type_hint(TypeHint::Uuid)
        .with_validator(UuidValidator)
        .with_behavior(ParseUuid)
}

fn parse_or_keep(value: Value) -> Value {
    match value.as_str().map(Uuid::parse_str) {
        Some(Ok(id)) => Value::Uuid(id),
        _ => value,
    }
}

/// Accepts UUIDs and strings that parse as one.
///
/// `Undefined` is accepted; combine with
/// [`RequiredValidator`](crate::adapters::RequiredValidator) to reject it.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidValidator;

impl Validator for UuidValidator {
    fn validate(
        &self,
        value: &Value,
        _ctx: &ValidationContext<'_>,
    ) -> std::result::Result<(), ValidationError> {
        match value {
            Value::Undefined | Value::Uuid(_) => Ok(()),
            Value::Str(s) => Uuid::parse_str(s)
                .map(|_| ())
                .map_err(|e| ValidationError::new(format!("Invalid value `{}`: {}", s, e))),
            other => Err(ValidationError::new(format!(
                "Invalid value of type `{}`: expected a UUID",
                other.kind()
            ))),
        }
    }

    fn describe(&self) -> String {
        "UUID".to_string()
    }
}

/// Parses strings into UUIDs on write, keeping those that do not parse.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseUuid;

impl Behavior for ParseUuid {
    fn set_value(
        &self,
        _ctx: &AccessContext<'_>,
        value: Value,
        next: &mut dyn FnMut(Value) -> Result<()>,
    ) -> Result<()> {
        next(parse_or_keep(value))
    }

    fn describe(&self) -> String {
        "parse UUID".to_string()
    }
}
