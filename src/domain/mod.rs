// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain layer containing core business logic and types.
//!
//! This module contains the settings model: values and type hints, the `Setting`
//! declaration unit, compiled settings types and their instances, the validation
//! pipeline, structured validation errors and update strategies. It is independent of
//! where values come from; sources live in the adapters layer.

pub mod error_details;
pub mod errors;
pub mod setting;
pub mod settings;
pub mod strategies;
pub mod type_hint;
mod validation;
pub mod value;

// Re-export commonly used types
pub use error_details::{ErrorDetail, ValidationErrors, INVALID_SETTINGS};
pub use errors::{Result, SettingsError, ValidationError};
pub use setting::{ComputeFn, Setting, SettingDefault};
pub use settings::{is_setting_name, Settings, SettingsType, SettingsTypeBuilder, ValidateHook};
pub use strategies::{Strategies, UpdateStrategy};
pub use type_hint::TypeHint;
pub use value::Value;
