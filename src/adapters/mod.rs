// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapters layer containing the built-in validators, behaviors and sources.
//!
//! This module contains concrete implementations of the traits defined in the ports
//! layer: validators and behaviors that can be attached to settings, sources that
//! provide setting values, and parsers for settings files.

pub mod behaviors;
#[cfg(feature = "cli")]
pub mod cli;
pub mod convert;
#[cfg(feature = "env")]
pub mod env_var;
pub mod file;
#[cfg(feature = "json")]
pub mod json_file;
pub mod map;
pub mod script_file;
pub mod uuid_setting;
pub mod validators;
#[cfg(feature = "yaml")]
pub mod yaml_file;

pub use behaviors::{Deprecated, Override, Required, Validate};
#[cfg(feature = "cli")]
pub use cli::CommandLineSource;
#[cfg(feature = "env")]
pub use env_var::EnvVarSource;
pub use file::FileSource;
#[cfg(feature = "json")]
pub use json_file::JsonParser;
pub use map::MapSource;
pub use script_file::ScriptParser;
pub use uuid_setting::{uuid_setting, ParseUuid, UuidValidator};
pub use validators::{DeprecatedValidator, RequiredValidator, ValueTypeValidator};
#[cfg(feature = "yaml")]
pub use yaml_file::YamlParser;
