// SPDX-License-Identifier: MIT OR Apache-2.0

//! The validation pipeline of [`Settings`].
//!
//! Every field runs its own validators, or the type's default validators when it has
//! none, followed by the mandatory validators. Nested settings are validated
//! recursively and their errors embedded under the owning field. The whole-object hook
//! runs only once every field passed.

use crate::domain::error_details::{ErrorDetail, ValidationErrors, INVALID_SETTINGS};
use crate::domain::errors::ValidationError;
use crate::domain::settings::Settings;
use crate::ports::ValidationContext;
use std::sync::Arc;

impl Settings {
    /// Validates all fields and collects every failure.
    ///
    /// The result is also stored and available through [`errors`](Self::errors).
    /// Validating again without changing anything yields the same errors.
    ///
    /// ```
    /// use hexsettings::domain::SettingsType;
    ///
    /// let ty = SettingsType::builder("App").value("PORT", 8080).build().unwrap();
    /// let mut settings = ty.instantiate().unwrap();
    /// settings.set("PORT", "notanint").unwrap();
    ///
    /// let errors = settings.validate();
    /// assert_eq!(
    ///     errors.messages(),
    ///     vec!["PORT: Expected value of type `int` got value of type `str`".to_string()]
    /// );
    /// ```
    pub fn validate(&mut self) -> &ValidationErrors {
        self.errors = ValidationErrors::new();
        let errors = match self.run_validation(false) {
            Ok(errors) => errors,
            Err(e) => {
                let mut errors = ValidationErrors::new();
                errors.insert(INVALID_SETTINGS, ErrorDetail::Message(e.to_string()));
                errors
            }
        };
        self.errors = errors;
        &self.errors
    }

    /// Validates the fields and stops at the first failure.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`], its path naming the failing field through
    /// every enclosing nested settings field.
    pub fn validate_fail_fast(&mut self) -> std::result::Result<(), ValidationError> {
        self.errors = ValidationErrors::new();
        self.run_validation(true).map(|_| ())
    }

    /// Runs a collecting validation pass and reports whether it found no errors.
    pub fn is_valid(&mut self) -> bool {
        self.validate().is_empty()
    }

    fn run_validation(
        &mut self,
        fail_fast: bool,
    ) -> std::result::Result<ValidationErrors, ValidationError> {
        self.is_being_validated = true;
        let result = self.validate_fields(fail_fast);
        self.is_being_validated = false;
        result
    }

    fn validate_fields(
        &mut self,
        fail_fast: bool,
    ) -> std::result::Result<ValidationErrors, ValidationError> {
        let ty = Arc::clone(self.settings_type());
        let mut errors = ValidationErrors::new();

        for (index, setting) in ty.fields().iter().enumerate() {
            let name = setting.name();

            let value = match self.get(name) {
                Ok(value) => value,
                Err(e) => {
                    if fail_fast {
                        return Err(ValidationError::new(e.to_string()).prepend_path(name));
                    }
                    errors.insert(name, ErrorDetail::Message(e.to_string()));
                    continue;
                }
            };

            let own = setting.validators();
            let first = if own.is_empty() {
                ty.default_validators()
            } else {
                own
            };
            let ctx = ValidationContext {
                name,
                owner: self,
                setting,
            };
            for validator in first.iter().chain(ty.mandatory_validators()) {
                if let Err(e) = validator.validate(&value, &ctx) {
                    if fail_fast {
                        return Err(e.prepend_path(name));
                    }
                    errors.insert(name, ErrorDetail::Message(e.to_string()));
                }
            }

            if let Some(nested) = self.slot_mut(index).and_then(|v| v.as_settings_mut()) {
                let nested_errors = nested
                    .run_validation(fail_fast)
                    .map_err(|e| e.prepend_path(name))?;
                nested.errors = nested_errors.clone();
                if !nested_errors.is_empty() {
                    errors.insert(name, ErrorDetail::Nested(nested_errors));
                }
            }
        }

        if errors.is_empty() {
            if let Some(hook) = ty.validate_hook() {
                if let Err(e) = hook(self) {
                    if fail_fast {
                        return Err(e);
                    }
                    errors.insert(INVALID_SETTINGS, ErrorDetail::Message(e.to_string()));
                }
            }
        }

        tracing::debug!(
            settings_type = %ty.name(),
            fields_with_errors = errors.len(),
            "validated settings"
        );
        Ok(errors)
    }
}
