// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service layer: turning source specifiers into sources and updating settings.
//!
//! The [`SourceRegistry`] picks the source for a specifier (a mapping, a file path or
//! a ready-made source). The `update` family of methods on
//! [`Settings`](crate::domain::Settings) is implemented here on top of it. The
//! [`SettingRegistry`] picks the setting declared for a plain value with a type hint.

pub mod registry;
pub mod setting_registry;
mod update;

// Re-export commonly used types
pub use registry::{
    get_source, register_source, FileSourceFactory, MapSourceFactory, SourceFactory,
    SourceRegistry, SourceSpec, UnavailableFormatFactory,
};
pub use setting_registry::{
    register_setting, setting_for, unregister_setting, SettingFactory, SettingRegistry,
};
