// SPDX-License-Identifier: MIT OR Apache-2.0

//! A hexagonal architecture settings framework.
//!
//! This crate lets applications declare their settings as typed fields of settings
//! types, compose those types through inheritance, validate instances as a whole, and
//! populate them from environment variables, command-line arguments, JSON, YAML and
//! Python-style settings files or in-memory mappings.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain Layer**: Core types and logic (`Value`, `TypeHint`, `Setting`,
//!   `SettingsType`, `Settings`, validation, update strategies, errors)
//! - **Ports**: Trait definitions that define interfaces (`Validator`, `Behavior`,
//!   `Source`, `ConfigParser`)
//! - **Adapters**: Built-in validators and behaviors, and the concrete sources
//! - **Service**: The source and setting registries, and the update pass
//!
//! # Features
//!
//! - **Declarative**: Settings types are compiled once from a builder; names, type
//!   hints and validators are resolved up front
//! - **Inheritance**: Multiple inheritance with C3 ordering; incompatible
//!   redefinitions are rejected unless marked with [`Override`](adapters::Override)
//! - **Validation**: All errors are collected into a nested structure, or the first
//!   one is returned with its full path
//! - **Behaviors**: Read and write interception, e.g. [`Deprecated`](adapters::Deprecated)
//! - **Multiple Sources**: Mappings, environment variables, CLI arguments, files
//! - **Update Strategies**: Overwrite, append or prepend per setting
//! - **Typed Settings**: Annotated values get the setting registered for their hint,
//!   e.g. [`uuid_setting`](adapters::uuid_setting) for `UUID`
//!
//! # Feature Flags
//!
//! - `json`: Enable JSON file support (default)
//! - `yaml`: Enable YAML file support (default)
//! - `env`: Enable environment variable support (default)
//! - `cli`: Enable command-line argument support (default)
//! - `full`: Enable all features
//!
//! # Quick Start
//!
//! ```rust
//! use hexsettings::prelude::*;
//! use std::collections::BTreeMap;
//!
//! # fn main() -> Result<()> {
//! let database = SettingsType::builder("Database")
//!     .value("HOST", "localhost")
//!     .value("PORT", 5432)
//!     .build()?;
//!
//! let app = SettingsType::builder("AppSettings")
//!     .value("DEBUG", false)
//!     .setting("SECRET_KEY", Setting::undefined().with_type_hint(TypeHint::Str).with_behavior(Required))
//!     .nested("DB", &database)
//!     .build()?;
//!
//! let mut settings = app.instantiate()?;
//! assert!(!settings.is_valid());
//!
//! let mut values = BTreeMap::new();
//! values.insert("SECRET_KEY".to_string(), Value::from("s3cr3t"));
//! settings.update(values)?;
//!
//! assert!(settings.validate().is_empty());
//! assert_eq!(settings.nested("DB").unwrap().get("PORT")?, Value::Int(5432));
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

/// Commonly used types and traits.
///
/// This module re-exports the most commonly used types and traits for convenient access.
pub mod prelude {
    pub use crate::domain::strategies;
    pub use crate::domain::{
        Result, Setting, Settings, SettingsError, SettingsType, Strategies, TypeHint,
        ValidationError, ValidationErrors, Value,
    };
    pub use crate::ports::{validator_fn, Behavior, ConfigParser, Source, Validator};
    pub use crate::service::{get_source, register_setting, register_source, SourceSpec};

    pub use crate::adapters::{
        uuid_setting, Deprecated, FileSource, MapSource, Override, Required, ScriptParser,
        UuidValidator, Validate, ValueTypeValidator,
    };
    // Re-export adapters based on feature flags
    #[cfg(feature = "cli")]
    pub use crate::adapters::CommandLineSource;
    #[cfg(feature = "env")]
    pub use crate::adapters::EnvVarSource;
    #[cfg(feature = "json")]
    pub use crate::adapters::JsonParser;
    #[cfg(feature = "yaml")]
    pub use crate::adapters::YamlParser;
}
