// SPDX-License-Identifier: MIT OR Apache-2.0

//! Built-in validators.
//!
//! - [`ValueTypeValidator`] checks a value against the setting's type hint and is the
//!   default validator of every settings type.
//! - [`RequiredValidator`] rejects `Undefined`.
//! - [`DeprecatedValidator`] warns about, or rejects, the use of a deprecated setting.

use crate::domain::{TypeHint, ValidationError, Value};
use crate::ports::{ValidationContext, Validator};

/// Checks that a value conforms to a type hint.
///
/// Without an explicit hint the setting's own type hint is used. `Undefined` values are
/// accepted; use [`RequiredValidator`] to reject them.
///
/// # Examples
///
/// ```
/// use hexsettings::adapters::validators::ValueTypeValidator;
/// use hexsettings::domain::{SettingsType, TypeHint};
///
/// let ty = SettingsType::builder("App")
///     .value("PORT", 8080)
///     .default_validators(vec![ValueTypeValidator::shared()])
///     .build()
///     .unwrap();
/// let mut settings = ty.instantiate().unwrap();
/// settings.set("PORT", 8080.5).unwrap();
/// assert!(!settings.is_valid());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ValueTypeValidator {
    type_hint: Option<TypeHint>,
}

impl ValueTypeValidator {
    /// Creates a validator that uses the setting's type hint.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a validator that checks against a fixed type hint.
    pub fn with_type_hint(type_hint: TypeHint) -> Self {
        Self {
            type_hint: Some(type_hint),
        }
    }

    /// Returns a new instance behind an `Arc`, ready for the validator slots.
    pub fn shared() -> std::sync::Arc<dyn Validator> {
        std::sync::Arc::new(Self::new())
    }
}

impl Validator for ValueTypeValidator {
    fn validate(
        &self,
        value: &Value,
        ctx: &ValidationContext<'_>,
    ) -> std::result::Result<(), ValidationError> {
        if value.is_undefined() {
            return Ok(());
        }
        let type_hint = self.type_hint.as_ref().unwrap_or(ctx.setting.type_hint());
        if type_hint.accepts(value) {
            Ok(())
        } else {
            Err(ValidationError::new(format!(
                "Expected value of type `{}` got value of type `{}`",
                type_hint,
                value.kind()
            )))
        }
    }

    fn describe(&self) -> String {
        match &self.type_hint {
            Some(hint) => format!("value of type `{}`", hint),
            None => "value of the declared type".to_string(),
        }
    }
}

/// Message template used by [`RequiredValidator`] when none is given.
pub const DEFAULT_REQUIRED_MESSAGE: &str =
    "Setting `{name}` is required to have a value. Current value is `Undefined`";

/// Rejects settings that still hold `Undefined`.
///
/// The message may contain `{name}` and `{owner}` placeholders.
#[derive(Debug, Clone)]
pub struct RequiredValidator {
    message: String,
}

impl RequiredValidator {
    /// Creates a validator with the default message.
    pub fn new() -> Self {
        Self::with_message(DEFAULT_REQUIRED_MESSAGE)
    }

    /// Creates a validator with a custom message template.
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Default for RequiredValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator for RequiredValidator {
    fn validate(
        &self,
        value: &Value,
        ctx: &ValidationContext<'_>,
    ) -> std::result::Result<(), ValidationError> {
        if value.is_undefined() {
            Err(ValidationError::new(render(&self.message, ctx)))
        } else {
            Ok(())
        }
    }

    fn describe(&self) -> String {
        "required".to_string()
    }
}

/// Reports the use of a deprecated setting during validation.
///
/// In warning mode the message is emitted through `tracing::warn!` and validation
/// passes; in error mode it becomes a validation error. The message may contain
/// `{name}` and `{owner}` placeholders.
#[derive(Debug, Clone)]
pub struct DeprecatedValidator {
    message: String,
    raise_error: bool,
}

impl DeprecatedValidator {
    /// Creates a deprecation validator.
    pub fn new(message: impl Into<String>, raise_error: bool) -> Self {
        Self {
            message: message.into(),
            raise_error,
        }
    }
}

impl Validator for DeprecatedValidator {
    fn validate(
        &self,
        _value: &Value,
        ctx: &ValidationContext<'_>,
    ) -> std::result::Result<(), ValidationError> {
        let message = render(&self.message, ctx);
        if self.raise_error {
            Err(ValidationError::new(message))
        } else {
            tracing::warn!(setting = %ctx.name, "{}", message);
            Ok(())
        }
    }

    fn describe(&self) -> String {
        "deprecated".to_string()
    }
}

fn render(template: &str, ctx: &ValidationContext<'_>) -> String {
    template
        .replace("{name}", ctx.name)
        .replace("{owner}", ctx.owner.type_name())
}
