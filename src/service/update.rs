// SPDX-License-Identifier: MIT OR Apache-2.0

//! Updating settings from sources.

use crate::domain::{Result, Settings, SettingsError, Strategies, Value};
use crate::ports::Source;
use crate::service::registry::{get_source, SourceSpec};
use std::sync::Arc;

impl Settings {
    /// Updates the settings from a source specifier, overwriting current values.
    ///
    /// The specifier is turned into a source by the process-wide registry, see
    /// [`get_source`](crate::service::get_source).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hexsettings::domain::{SettingsType, Value};
    /// use std::collections::BTreeMap;
    ///
    /// let ty = SettingsType::builder("App").value("PORT", 8080).build().unwrap();
    /// let mut settings = ty.instantiate().unwrap();
    ///
    /// let mut values = BTreeMap::new();
    /// values.insert("PORT".to_string(), Value::from(9090));
    /// settings.update(values).unwrap();
    /// assert_eq!(settings.get("PORT").unwrap(), Value::Int(9090));
    /// ```
    pub fn update(&mut self, spec: impl Into<SourceSpec>) -> Result<()> {
        self.update_with(spec, &Strategies::new())
    }

    /// Updates the settings from a source specifier with per-setting strategies.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hexsettings::domain::{strategies, SettingsType, Strategies, Value};
    /// use std::collections::BTreeMap;
    ///
    /// let ty = SettingsType::builder("App")
    ///     .value("HOSTS", vec!["localhost"])
    ///     .build()
    ///     .unwrap();
    /// let mut settings = ty.instantiate().unwrap();
    ///
    /// let mut values = BTreeMap::new();
    /// values.insert("HOSTS".to_string(), Value::from(vec!["example.com"]));
    /// settings
    ///     .update_with(values, &Strategies::new().with("HOSTS", strategies::append))
    ///     .unwrap();
    /// assert_eq!(
    ///     settings.get("HOSTS").unwrap(),
    ///     Value::from(vec!["localhost", "example.com"])
    /// );
    /// ```
    pub fn update_with(
        &mut self,
        spec: impl Into<SourceSpec>,
        strategies: &Strategies,
    ) -> Result<()> {
        let source = get_source(spec)?;
        self.update_from(source.as_ref(), strategies)
    }

    /// Updates the settings from a source.
    ///
    /// Every non-computed setting is read from the source with the names of its
    /// enclosing nested settings as parents. Settings the source has no value for are
    /// left unchanged; the others are set to the result of their strategy, looked up by
    /// dotted path (`DB.HOST`). Writes go through the behavior chain.
    ///
    /// # Errors
    ///
    /// Returns the source's read error, or [`SettingsError::Update`] naming the
    /// setting whose strategy failed.
    pub fn update_from(&mut self, source: &dyn Source, strategies: &Strategies) -> Result<()> {
        tracing::debug!("Updating {} from source {}", self.type_name(), source.name());
        let mut parents = Vec::new();
        self.update_fields(source, strategies, &mut parents)
    }

    fn update_fields(
        &mut self,
        source: &dyn Source,
        strategies: &Strategies,
        parents: &mut Vec<String>,
    ) -> Result<()> {
        let ty = Arc::clone(self.settings_type());

        for (index, setting) in ty.fields().iter().enumerate() {
            if setting.is_computed() {
                continue;
            }

            if let Some(nested) = self.slot_mut(index).and_then(Value::as_settings_mut) {
                parents.push(setting.name().to_string());
                nested.update_fields(source, strategies, parents)?;
                parents.pop();
                continue;
            }

            let Some(incoming) = source.read(setting, parents)? else {
                continue;
            };

            let path = dotted_path(parents, setting.name());
            let strategy = strategies.get(&path);
            tracing::debug!(
                "Updating setting {} with strategy {}",
                path,
                strategy.describe()
            );

            let current = self.get(setting.name())?;
            let merged = strategy
                .merge(current, incoming)
                .map_err(|e| SettingsError::Update {
                    setting: path,
                    source: Box::new(e),
                })?;
            self.set(setting.name(), merged)?;
        }
        Ok(())
    }
}

fn dotted_path(parents: &[String], name: &str) -> String {
    if parents.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", parents.join("."), name)
    }
}
