// SPDX-License-Identifier: MIT OR Apache-2.0

//! Settings source trait definition.
//!
//! This module defines the `Source` trait, the port through which external values
//! reach a settings instance during an update. Any source (environment variables,
//! files, in-memory maps, etc.) must implement this trait.

use crate::domain::{Result, Setting, Value};
use std::fmt;

/// A trait for settings sources.
///
/// A source is asked for one setting at a time, addressed by the setting itself and
/// the names of the enclosing nested settings fields, outermost first.
///
/// # Not found
///
/// `Ok(None)` means the source has no value for the setting, and the update leaves the
/// current value as it is. This is distinct from [`Value::Undefined`], which a source
/// may legitimately return as a value.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so sources can be kept in the process-wide
/// registry.
///
/// # Examples
///
/// ```rust
/// use hexsettings::domain::{Result, Setting, Value};
/// use hexsettings::ports::Source;
///
/// struct Constant;
///
/// impl Source for Constant {
///     fn name(&self) -> &str {
///         "constant"
///     }
///
///     fn read(&self, setting: &Setting, _parents: &[String]) -> Result<Option<Value>> {
///         if setting.name() == "PORT" {
///             Ok(Some(Value::from(9090)))
///         } else {
///             Ok(None)
///         }
///     }
/// }
/// ```
pub trait Source: Send + Sync {
    /// Returns the name of this source.
    ///
    /// This name is used for logging, error messages, and debugging. It should be
    /// a short, descriptive identifier like "env", "json-file", "map", etc.
    fn name(&self) -> &str;

    /// Reads the value for a setting.
    ///
    /// # Arguments
    ///
    /// * `setting` - The setting to read; its name and type hint are available
    /// * `parents` - Names of the enclosing nested settings fields, outermost first
    ///
    /// # Returns
    ///
    /// * `Ok(Some(Value))` - The source has a value
    /// * `Ok(None)` - The source has no value for this setting
    /// * `Err(SettingsError)` - Reading failed
    fn read(&self, setting: &Setting, parents: &[String]) -> Result<Option<Value>>;
}

impl fmt::Debug for dyn Source {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_tuple("Source").field(&self.name()).finish()
    }
}
