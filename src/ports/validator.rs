// SPDX-License-Identifier: MIT OR Apache-2.0

//! Validator trait definition.
//!
//! This module defines the `Validator` trait, the port through which setting values are
//! checked during an explicit validation pass. Validators never run on plain reads or
//! writes.

use crate::domain::{Setting, Settings, ValidationError, Value};
use std::fmt;
use std::sync::Arc;

/// Everything a validator may need to know about the value it inspects.
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext<'a> {
    /// Name of the validated field.
    pub name: &'a str,
    /// The settings instance that owns the field.
    pub owner: &'a Settings,
    /// The field declaration.
    pub setting: &'a Setting,
}

/// A check applied to a setting value during validation.
///
/// Validators must tolerate [`Value::Undefined`] unless they exist to check for it.
/// Plain functions and closures with the matching signature implement this trait.
///
/// # Thread Safety
///
/// Validators are shared between settings types and instances, so implementations must
/// be `Send + Sync`.
///
/// # Examples
///
/// ```rust
/// use hexsettings::domain::{ValidationError, Value};
/// use hexsettings::ports::{ValidationContext, Validator};
///
/// struct Positive;
///
/// impl Validator for Positive {
///     fn validate(&self, value: &Value, _ctx: &ValidationContext<'_>) -> Result<(), ValidationError> {
///         match value.as_int() {
///             Some(n) if n <= 0 => Err(ValidationError::new("Value should be positive")),
///             _ => Ok(()),
///         }
///     }
/// }
/// ```
pub trait Validator: Send + Sync {
    /// Checks a value.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] describing why the value is invalid.
    fn validate(
        &self,
        value: &Value,
        ctx: &ValidationContext<'_>,
    ) -> std::result::Result<(), ValidationError>;

    /// Returns a short human readable description.
    fn describe(&self) -> String {
        std::any::type_name::<Self>().to_string()
    }
}

impl<F> Validator for F
where
    F: Fn(&Value, &ValidationContext<'_>) -> std::result::Result<(), ValidationError>
        + Send
        + Sync,
{
    fn validate(
        &self,
        value: &Value,
        ctx: &ValidationContext<'_>,
    ) -> std::result::Result<(), ValidationError> {
        self(value, ctx)
    }
}

impl fmt::Debug for dyn Validator {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_tuple("Validator")
            .field(&self.describe())
            .finish()
    }
}

/// Wraps a closure into a shareable validator.
///
/// Using this helper lets the compiler infer the closure argument types.
///
/// ```rust
/// use hexsettings::domain::ValidationError;
/// use hexsettings::ports::validator_fn;
///
/// let non_empty = validator_fn(|value, ctx| match value.as_str() {
///     Some("") => Err(ValidationError::new(format!("{} must not be empty", ctx.name))),
///     _ => Ok(()),
/// });
/// assert!(non_empty.describe().contains("closure"));
/// ```
pub fn validator_fn<F>(f: F) -> Arc<dyn Validator>
where
    F: Fn(&Value, &ValidationContext<'_>) -> std::result::Result<(), ValidationError>
        + Send
        + Sync
        + 'static,
{
    Arc::new(f)
}
