// SPDX-License-Identifier: MIT OR Apache-2.0

//! Update strategies.
//!
//! An update strategy combines the current value of a setting with the value read
//! from a source. Strategies are selected per setting by its dotted path; settings
//! without an entry are overwritten.

use crate::domain::errors::Result;
use crate::domain::value::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Combines a current and an incoming value into the new value of a setting.
///
/// Functions and closures taking `(current, incoming)` implement this trait.
pub trait UpdateStrategy: Send + Sync {
    /// Merges the incoming value into the current one.
    ///
    /// # Errors
    ///
    /// Returns an error if the values cannot be combined.
    fn merge(&self, current: Value, incoming: Value) -> Result<Value>;

    /// Returns a short name used in logs.
    fn describe(&self) -> String {
        std::any::type_name::<Self>().to_string()
    }
}

impl<F> UpdateStrategy for F
where
    F: Fn(Value, Value) -> Result<Value> + Send + Sync,
{
    fn merge(&self, current: Value, incoming: Value) -> Result<Value> {
        self(current, incoming)
    }
}

impl fmt::Debug for dyn UpdateStrategy {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_tuple("UpdateStrategy")
            .field(&self.describe())
            .finish()
    }
}

/// Replaces the current value.
pub fn overwrite(_current: Value, incoming: Value) -> Result<Value> {
    Ok(incoming)
}

/// Concatenates the incoming value after the current one.
pub fn append(current: Value, incoming: Value) -> Result<Value> {
    current.concat(incoming)
}

/// Concatenates the incoming value before the current one.
pub fn prepend(current: Value, incoming: Value) -> Result<Value> {
    incoming.concat(current)
}

/// Update strategies keyed by dotted setting path.
///
/// # Examples
///
/// ```
/// use hexsettings::domain::strategies::{self, Strategies};
/// use hexsettings::domain::Value;
///
/// let strategies = Strategies::new().with("DB.HOSTS", strategies::append);
/// let merged = strategies
///     .get("DB.HOSTS")
///     .merge(Value::from(vec!["a"]), Value::from(vec!["b"]))
///     .unwrap();
/// assert_eq!(merged, Value::from(vec!["a", "b"]));
///
/// // Unlisted settings are overwritten.
/// let merged = strategies.get("PORT").merge(Value::from(1), Value::from(2)).unwrap();
/// assert_eq!(merged, Value::from(2));
/// ```
#[derive(Clone, Debug, Default)]
pub struct Strategies {
    by_path: HashMap<String, Arc<dyn UpdateStrategy>>,
}

impl Strategies {
    /// Creates an empty strategy table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a strategy for a dotted setting path.
    pub fn with(mut self, path: impl Into<String>, strategy: impl UpdateStrategy + 'static) -> Self {
        self.insert(path, Arc::new(strategy));
        self
    }

    /// Adds a shared strategy for a dotted setting path.
    pub fn insert(&mut self, path: impl Into<String>, strategy: Arc<dyn UpdateStrategy>) {
        self.by_path.insert(path.into(), strategy);
    }

    /// Returns the strategy for a path, [`overwrite`] when none is registered.
    pub fn get(&self, path: &str) -> Arc<dyn UpdateStrategy> {
        self.by_path
            .get(path)
            .cloned()
            .unwrap_or_else(|| Arc::new(overwrite) as Arc<dyn UpdateStrategy>)
    }

    /// Returns `true` if a strategy is registered for the path.
    pub fn contains(&self, path: &str) -> bool {
        self.by_path.contains_key(path)
    }
}
