// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory mapping source adapter.

use crate::domain::{Result, Setting, Value};
use crate::ports::Source;
use std::collections::BTreeMap;

/// Settings source backed by an in-memory mapping.
///
/// Nested settings are addressed through nested mappings: the value of `DB.HOST` is
/// found under key `HOST` of the mapping stored under key `DB`.
///
/// # Examples
///
/// ```rust
/// use hexsettings::adapters::MapSource;
/// use hexsettings::domain::{SettingsType, Strategies, Value};
/// use std::collections::BTreeMap;
///
/// let ty = SettingsType::builder("App").value("PORT", 8080).build().unwrap();
/// let mut settings = ty.instantiate().unwrap();
///
/// let mut data = BTreeMap::new();
/// data.insert("PORT".to_string(), Value::from(9090));
/// settings.update_from(&MapSource::new(data), &Strategies::new()).unwrap();
/// assert_eq!(settings.get("PORT").unwrap(), Value::Int(9090));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MapSource {
    data: BTreeMap<String, Value>,
}

impl MapSource {
    /// Creates a source from a mapping.
    pub fn new(data: BTreeMap<String, Value>) -> Self {
        Self { data }
    }

    /// Adds or replaces a top-level value.
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Returns the underlying mapping.
    pub fn data(&self) -> &BTreeMap<String, Value> {
        &self.data
    }
}

impl From<BTreeMap<String, Value>> for MapSource {
    fn from(data: BTreeMap<String, Value>) -> Self {
        Self::new(data)
    }
}

impl Source for MapSource {
    fn name(&self) -> &str {
        "map"
    }

    fn read(&self, setting: &Setting, parents: &[String]) -> Result<Option<Value>> {
        Ok(lookup(&self.data, parents, setting.name()).cloned())
    }
}

/// Walks nested mappings along `parents` and returns the value stored under `name`.
pub(crate) fn lookup<'a>(
    root: &'a BTreeMap<String, Value>,
    parents: &[String],
    name: &str,
) -> Option<&'a Value> {
    let mut current = root;
    for parent in parents {
        current = current.get(parent)?.as_map()?;
    }
    current.get(name)
}
