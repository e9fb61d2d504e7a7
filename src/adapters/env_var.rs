// SPDX-License-Identifier: MIT OR Apache-2.0

//! Environment variable settings source adapter.
//!
//! This module provides a source that reads setting values from environment
//! variables.

use crate::adapters::convert::convert_str;
use crate::domain::{Result, Setting, Value};
use crate::ports::Source;
use std::collections::HashMap;
use std::env;
use std::sync::{PoisonError, RwLock};

/// Maximum length for environment variable keys (prevents DoS)
const MAX_ENV_KEY_LEN: usize = 512;

/// Maximum length for environment variable values (prevents DoS)
const MAX_ENV_VALUE_LEN: usize = 1048576; // 1MB

/// Settings source for environment variables.
///
/// The variable name of a setting is built from the optional prefix followed by the
/// upper-cased names of the enclosing settings and the setting itself, joined by
/// underscores: `DB.HOST` is read from `DB_HOST`, or `APP_DB_HOST` with prefix `APP_`.
///
/// Values are strings; they are converted according to the setting's type hint, see
/// [`convert_str`].
///
/// The environment is read once, on first access, and cached. Call
/// [`reload`](Self::reload) to take a new snapshot.
///
/// # Examples
///
/// ```rust
/// use hexsettings::adapters::EnvVarSource;
///
/// // Read all environment variables
/// let source = EnvVarSource::new();
///
/// // Read MYAPP_PORT for the PORT setting
/// let source = EnvVarSource::with_prefix("MYAPP_");
/// ```
#[derive(Debug)]
pub struct EnvVarSource {
    /// Optional prefix prepended to every variable name
    prefix: String,
    /// Snapshot of the environment with interior mutability for thread-safe lazy loading
    cache: RwLock<Option<HashMap<String, String>>>,
}

impl EnvVarSource {
    /// Creates a new environment variable source without a prefix.
    pub fn new() -> Self {
        Self {
            prefix: String::new(),
            cache: RwLock::new(None),
        }
    }

    /// Creates a new environment variable source with a prefix.
    ///
    /// The prefix is used verbatim, so include the separator: `"APP_"`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hexsettings::adapters::EnvVarSource;
    ///
    /// let source = EnvVarSource::with_prefix("MYAPP_");
    /// assert_eq!(source.variable_name("PORT", &["DB".to_string()]), "MYAPP_DB_PORT");
    /// ```
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            cache: RwLock::new(None),
        }
    }

    /// Creates a source with pre-populated variables instead of the process environment.
    ///
    /// **Note**: This method is primarily intended for testing.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hexsettings::adapters::EnvVarSource;
    /// use std::collections::HashMap;
    ///
    /// let mut values = HashMap::new();
    /// values.insert("PORT".to_string(), "9090".to_string());
    ///
    /// let source = EnvVarSource::with_values(values);
    /// ```
    pub fn with_values(values: HashMap<String, String>) -> Self {
        Self {
            prefix: String::new(),
            cache: RwLock::new(Some(values)),
        }
    }

    /// Returns the variable name used for a setting.
    pub fn variable_name(&self, name: &str, parents: &[String]) -> String {
        let mut key = self.prefix.clone();
        for parent in parents {
            key.push_str(&parent.to_uppercase());
            key.push('_');
        }
        key.push_str(&name.to_uppercase());
        key
    }

    /// Drops the cached snapshot; the environment is read again on next access.
    pub fn reload(&self) {
        let mut cache_guard = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        *cache_guard = None;
    }

    /// Loads environment variables into a new HashMap.
    fn load(&self) -> HashMap<String, String> {
        let mut cache = HashMap::new();

        for (key, value) in env::vars() {
            // Validate input sizes to prevent DoS
            if key.len() > MAX_ENV_KEY_LEN || value.len() > MAX_ENV_VALUE_LEN {
                tracing::debug!(
                    "Skipping oversized environment variable: key_len={}, value_len={} (max key={}, max value={})",
                    key.len(),
                    value.len(),
                    MAX_ENV_KEY_LEN,
                    MAX_ENV_VALUE_LEN
                );
                continue;
            }
            if !key.starts_with(&self.prefix) {
                continue;
            }
            cache.insert(key, value);
        }

        tracing::debug!(
            "Loaded {} environment variables (prefix={:?})",
            cache.len(),
            self.prefix
        );

        cache
    }

    /// Looks up a variable, loading the snapshot if necessary.
    fn lookup(&self, key: &str) -> Option<String> {
        {
            let cache_guard = self.cache.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(cache) = cache_guard.as_ref() {
                return cache.get(key).cloned();
            }
        }

        // Cache miss - need to load
        let new_cache = self.load();
        let value = new_cache.get(key).cloned();
        let mut cache_guard = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        *cache_guard = Some(new_cache);
        value
    }
}

impl Default for EnvVarSource {
    fn default() -> Self {
        Self::new()
    }
}

impl Source for EnvVarSource {
    fn name(&self) -> &str {
        "env"
    }

    fn read(&self, setting: &Setting, parents: &[String]) -> Result<Option<Value>> {
        let key = self.variable_name(setting.name(), parents);
        Ok(self
            .lookup(&key)
            .map(|raw| convert_str(&raw, setting.type_hint())))
    }
}
