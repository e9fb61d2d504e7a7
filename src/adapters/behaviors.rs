// SPDX-License-Identifier: MIT OR Apache-2.0

//! Built-in behaviors.
//!
//! Behaviors are applied to a declaration with
//! [`Setting::with_behavior`](crate::domain::Setting::with_behavior):
//!
//! ```
//! use hexsettings::adapters::behaviors::{Deprecated, Override, Required};
//! use hexsettings::domain::{Setting, TypeHint};
//!
//! let port = Setting::new(8080)
//!     .with_type_hint(TypeHint::Int)
//!     .with_behavior(Override)
//!     .with_behavior(Deprecated::new().warn_on_get(true));
//! assert!(port.is_override());
//!
//! let host = Setting::undefined().with_behavior(Required);
//! assert_eq!(host.validators().len(), 1);
//! ```

use crate::adapters::validators::{DeprecatedValidator, RequiredValidator};
use crate::domain::{Result, Setting, Value};
use crate::ports::{AccessContext, Behavior, Validator};
use std::sync::Arc;

/// Marks a redeclared setting as an intentional change of its base declaration.
///
/// The structure check does not compare an overriding declaration with the one before
/// it. Reads and writes are not intercepted.
#[derive(Debug, Clone, Copy, Default)]
pub struct Override;

impl Behavior for Override {
    fn attach(&self, setting: &mut Setting) {
        setting.mark_override();
    }

    fn describe(&self) -> String {
        "override".to_string()
    }
}

/// Prepends a [`RequiredValidator`], so validation fails while the value is `Undefined`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Required;

impl Behavior for Required {
    fn attach(&self, setting: &mut Setting) {
        setting.prepend_validator(Arc::new(RequiredValidator::new()));
    }

    fn describe(&self) -> String {
        "required".to_string()
    }
}

/// Appends validators to the setting, keeping the ones it already has.
#[derive(Debug, Clone, Default)]
pub struct Validate {
    validators: Vec<Arc<dyn Validator>>,
}

impl Validate {
    /// Creates the behavior from shared validators.
    pub fn new<I>(validators: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn Validator>>,
    {
        Self {
            validators: validators.into_iter().collect(),
        }
    }
}

impl Behavior for Validate {
    fn attach(&self, setting: &mut Setting) {
        for validator in &self.validators {
            setting.push_validator(Arc::clone(validator));
        }
    }

    fn describe(&self) -> String {
        "validate".to_string()
    }
}

/// Default deprecation message. `{name}` and `{owner}` are substituted.
pub const DEFAULT_DEPRECATION_MESSAGE: &str = "Setting `{name}` in class `{owner}` is deprecated.";

/// Marks a setting as deprecated.
///
/// By default the deprecation is reported as a warning during validation. Warnings
/// on read and write can be enabled; they are suppressed while the owner is being
/// validated so the validator does not report twice. Warnings go through
/// `tracing::warn!`.
#[derive(Debug, Clone)]
pub struct Deprecated {
    message: String,
    warn_on_validation: bool,
    error_on_validation: bool,
    warn_on_get: bool,
    warn_on_set: bool,
}

impl Deprecated {
    /// Creates the behavior with the default message and options.
    pub fn new() -> Self {
        Self {
            message: DEFAULT_DEPRECATION_MESSAGE.to_string(),
            warn_on_validation: true,
            error_on_validation: false,
            warn_on_get: false,
            warn_on_set: false,
        }
    }

    /// Sets a custom message template.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Warns during validation (default `true`).
    pub fn warn_on_validation(mut self, enabled: bool) -> Self {
        self.warn_on_validation = enabled;
        self
    }

    /// Fails validation instead of warning (default `false`).
    pub fn error_on_validation(mut self, enabled: bool) -> Self {
        self.error_on_validation = enabled;
        self
    }

    /// Warns on every read outside validation (default `false`).
    pub fn warn_on_get(mut self, enabled: bool) -> Self {
        self.warn_on_get = enabled;
        self
    }

    /// Warns on every write outside validation (default `false`).
    pub fn warn_on_set(mut self, enabled: bool) -> Self {
        self.warn_on_set = enabled;
        self
    }

    fn warn(&self, ctx: &AccessContext<'_>) {
        let message = self
            .message
            .replace("{name}", ctx.setting.name())
            .replace("{owner}", ctx.owner.type_name());
        tracing::warn!(setting = %ctx.setting.name(), "{}", message);
    }
}

impl Default for Deprecated {
    fn default() -> Self {
        Self::new()
    }
}

impl Behavior for Deprecated {
    fn attach(&self, setting: &mut Setting) {
        if self.warn_on_validation || self.error_on_validation {
            setting.prepend_validator(Arc::new(DeprecatedValidator::new(
                self.message.clone(),
                self.error_on_validation,
            )));
        }
    }

    fn get_value(
        &self,
        ctx: &AccessContext<'_>,
        next: &mut dyn FnMut() -> Result<Value>,
    ) -> Result<Value> {
        if self.warn_on_get && !ctx.owner.is_being_validated() {
            self.warn(ctx);
        }
        next()
    }

    fn set_value(
        &self,
        ctx: &AccessContext<'_>,
        value: Value,
        next: &mut dyn FnMut(Value) -> Result<()>,
    ) -> Result<()> {
        if self.warn_on_set && !ctx.owner.is_being_validated() {
            self.warn(ctx);
        }
        next(value)
    }

    fn describe(&self) -> String {
        "deprecated".to_string()
    }
}
