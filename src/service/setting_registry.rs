// SPDX-License-Identifier: MIT OR Apache-2.0

//! Setting registry.
//!
//! Plain values declared with an explicit type hint
//! ([`SettingsTypeBuilder::typed_value`](crate::domain::SettingsTypeBuilder::typed_value))
//! are turned into settings by the factory registered for that hint. Hints without a
//! factory get a plain [`Setting`]. Declarations made with an explicit [`Setting`]
//! never go through the registry.

use crate::adapters::uuid_setting;
use crate::domain::{Setting, TypeHint, Value};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Builds the setting declared for a default value.
pub type SettingFactory = fn(Value) -> Setting;

/// Maps type hints to setting factories.
///
/// # Examples
///
/// ```rust
/// use hexsettings::domain::{Setting, TypeHint, Value};
/// use hexsettings::service::SettingRegistry;
///
/// fn documented(value: Value) -> Setting {
///     Setting::new(value).with_doc("a float")
/// }
///
/// let mut registry = SettingRegistry::new();
/// registry.register_setting(TypeHint::Float, documented);
///
/// assert_eq!(registry.setting_for(&TypeHint::Float, Value::from(1.5)).doc(), "a float");
/// assert_eq!(registry.setting_for(&TypeHint::Int, Value::from(1)).doc(), "");
/// ```
#[derive(Debug, Clone, Default)]
pub struct SettingRegistry {
    factories: HashMap<TypeHint, SettingFactory>,
}

impl SettingRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the built-in UUID setting.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register_setting(TypeHint::Uuid, uuid_setting::<Value>);
        registry
    }

    /// Registers the factory for a hint and returns the one it replaces.
    pub fn register_setting(
        &mut self,
        type_hint: TypeHint,
        factory: SettingFactory,
    ) -> Option<SettingFactory> {
        tracing::debug!(type_hint = %type_hint, "registering setting factory");
        self.factories.insert(type_hint, factory)
    }

    /// Removes the factory for a hint.
    pub fn unregister_setting(&mut self, type_hint: &TypeHint) -> Option<SettingFactory> {
        self.factories.remove(type_hint)
    }

    /// Returns the factory registered for a hint.
    pub fn factory_for(&self, type_hint: &TypeHint) -> Option<SettingFactory> {
        self.factories.get(type_hint).copied()
    }

    /// Builds the setting for a default value declared with `type_hint`.
    pub fn setting_for(&self, type_hint: &TypeHint, value: Value) -> Setting {
        build(self.factory_for(type_hint), value)
    }
}

fn build(factory: Option<SettingFactory>, value: Value) -> Setting {
    match factory {
        Some(factory) => factory(value),
        None => Setting::new(value),
    }
}

static REGISTRY: Lazy<RwLock<SettingRegistry>> =
    Lazy::new(|| RwLock::new(SettingRegistry::with_defaults()));

/// Registers a factory in the process-wide registry and returns the one it replaces.
pub fn register_setting(type_hint: TypeHint, factory: SettingFactory) -> Option<SettingFactory> {
    REGISTRY
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .register_setting(type_hint, factory)
}

/// Removes a factory from the process-wide registry.
pub fn unregister_setting(type_hint: &TypeHint) -> Option<SettingFactory> {
    REGISTRY
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .unregister_setting(type_hint)
}

/// Builds a setting with the process-wide registry.
pub fn setting_for(type_hint: &TypeHint, value: impl Into<Value>) -> Setting {
    // Release the lock before running the factory
    let factory = REGISTRY
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .factory_for(type_hint);
    build(factory, value.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marked(value: Value) -> Setting {
        Setting::new(value).with_doc("marked")
    }

    #[test]
    fn test_unregistered_hint_gives_plain_setting() {
        let registry = SettingRegistry::new();
        let setting = registry.setting_for(&TypeHint::Float, Value::from(1.5));
        assert_eq!(setting.doc(), "");
        assert!(setting.validators().is_empty());
        assert!(setting.behaviors().is_empty());
    }

    #[test]
    fn test_registered_factory_is_used() {
        let mut registry = SettingRegistry::new();
        assert!(registry.register_setting(TypeHint::Float, marked).is_none());
        assert_eq!(
            registry.setting_for(&TypeHint::Float, Value::from(1.5)).doc(),
            "marked"
        );
        assert!(registry.register_setting(TypeHint::Float, marked).is_some());

        registry.unregister_setting(&TypeHint::Float);
        assert!(registry.factory_for(&TypeHint::Float).is_none());
    }

    #[test]
    fn test_defaults_register_uuid() {
        let registry = SettingRegistry::with_defaults();
        let setting = registry.setting_for(&TypeHint::Uuid, Value::Undefined);
        assert_eq!(setting.type_hint(), &TypeHint::Uuid);
        assert_eq!(setting.validators().len(), 1);
        assert_eq!(setting.behaviors().len(), 1);
    }
}
