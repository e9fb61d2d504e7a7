// SPDX-License-Identifier: MIT OR Apache-2.0

//! The declared setting unit.
//!
//! A [`Setting`] is a single typed field of a settings type: a default value (or a
//! computation), a type hint, a validator chain, a behavior chain and an override
//! flag. Settings are declared through the fluent methods below and handed to a
//! [`SettingsTypeBuilder`](crate::domain::SettingsTypeBuilder), which binds their
//! names.

use crate::domain::errors::{Result, SettingsError};
use crate::domain::settings::Settings;
use crate::domain::type_hint::TypeHint;
use crate::domain::value::Value;
use crate::ports::{Behavior, Behaviors, Validator};
use std::fmt;
use std::sync::Arc;

/// The function behind a computed setting.
pub type ComputeFn = Arc<dyn Fn(&Settings) -> Result<Value> + Send + Sync>;

/// Where the value of a setting comes from when it has not been written.
#[derive(Clone)]
pub enum SettingDefault {
    /// A stored default, cloned into every new instance.
    Value(Value),
    /// A computation re-evaluated on every read.
    Computed(ComputeFn),
}

impl fmt::Debug for SettingDefault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingDefault::Value(v) => f.debug_tuple("Value").field(v).finish(),
            SettingDefault::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// A declared, typed and validated settings field.
///
/// # Examples
///
/// ```
/// use hexsettings::adapters::behaviors::Required;
/// use hexsettings::domain::{Setting, TypeHint};
///
/// let host = Setting::undefined()
///     .with_type_hint(TypeHint::Str)
///     .with_doc("Database host")
///     .with_behavior(Required);
/// assert!(host.default_value().map_or(false, |v| v.is_undefined()));
/// assert_eq!(host.validators().len(), 1);
/// ```
#[derive(Clone)]
pub struct Setting {
    name: String,
    default: SettingDefault,
    type_hint: TypeHint,
    doc: String,
    validators: Vec<Arc<dyn Validator>>,
    behaviors: Behaviors,
    overrides: bool,
}

impl Setting {
    /// Creates a setting with a default value.
    pub fn new(value: impl Into<Value>) -> Self {
        Self::with_default(SettingDefault::Value(value.into()))
    }

    /// Creates a setting without a default value.
    pub fn undefined() -> Self {
        Self::new(Value::Undefined)
    }

    /// Creates a read-only setting whose value is computed from its owner on every read.
    pub fn computed<F>(f: F) -> Self
    where
        F: Fn(&Settings) -> Result<Value> + Send + Sync + 'static,
    {
        Self::with_default(SettingDefault::Computed(Arc::new(f)))
    }

    fn with_default(default: SettingDefault) -> Self {
        Self {
            name: String::new(),
            default,
            type_hint: TypeHint::Infer,
            doc: String::new(),
            validators: Vec::new(),
            behaviors: Behaviors::new(),
            overrides: false,
        }
    }

    /// Sets the documentation string.
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = doc.into();
        self
    }

    /// Sets an explicit type hint.
    pub fn with_type_hint(mut self, type_hint: TypeHint) -> Self {
        self.type_hint = type_hint;
        self
    }

    /// Appends a validator.
    pub fn with_validator(mut self, validator: impl Validator + 'static) -> Self {
        self.validators.push(Arc::new(validator));
        self
    }

    /// Appends shared validators, preserving their order.
    pub fn with_validators<I>(mut self, validators: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn Validator>>,
    {
        self.validators.extend(validators);
        self
    }

    /// Applies a behavior to this declaration.
    ///
    /// The behavior is attached first and then injected in front of the chain, so the
    /// last behavior applied runs outermost.
    pub fn with_behavior(mut self, behavior: impl Behavior + 'static) -> Self {
        self.inject(Arc::new(behavior));
        self
    }

    /// Attaches and injects a shared behavior.
    pub fn inject(&mut self, behavior: Arc<dyn Behavior>) {
        behavior.attach(self);
        self.behaviors.inject(behavior);
    }

    /// Marks the setting as an explicit override of a base declaration.
    pub fn mark_override(&mut self) {
        self.overrides = true;
    }

    /// Puts a validator in front of the validator chain.
    pub fn prepend_validator(&mut self, validator: Arc<dyn Validator>) {
        self.validators.insert(0, validator);
    }

    /// Appends a validator to the validator chain.
    pub fn push_validator(&mut self, validator: Arc<dyn Validator>) {
        self.validators.push(validator);
    }

    /// Binds the setting to its field name.
    ///
    /// Binding again with the same name is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Definition`] if the setting is already bound to a
    /// different name.
    pub fn bind(&mut self, name: &str) -> Result<()> {
        if self.name.is_empty() {
            self.name = name.to_string();
            Ok(())
        } else if self.name == name {
            Ok(())
        } else {
            Err(SettingsError::definition(format!(
                "setting `{}` cannot be rebound to `{}`",
                self.name, name
            )))
        }
    }

    /// Reads the value of this setting.
    ///
    /// Without an owner the declared default is returned unchanged (computed settings
    /// have no declared value and read as `Undefined`). With an owner the read goes
    /// through the behavior chain of the owner's field.
    pub fn read(&self, owner: Option<&Settings>) -> Result<Value> {
        match owner {
            None => Ok(self.default_value().cloned().unwrap_or_default()),
            Some(owner) => owner.get(&self.name),
        }
    }

    /// Writes a value through the behavior chain of the owner's field.
    pub fn write(&self, owner: &mut Settings, value: impl Into<Value>) -> Result<()> {
        owner.set(&self.name, value)
    }

    pub(crate) fn set_type_hint(&mut self, type_hint: TypeHint) {
        self.type_hint = type_hint;
    }

    /// Returns the bound name, empty before binding.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the documentation string.
    pub fn doc(&self) -> &str {
        &self.doc
    }

    /// Returns the type hint.
    pub fn type_hint(&self) -> &TypeHint {
        &self.type_hint
    }

    /// Returns the validators in the order they run.
    pub fn validators(&self) -> &[Arc<dyn Validator>] {
        &self.validators
    }

    /// Returns the behavior chain.
    pub fn behaviors(&self) -> &Behaviors {
        &self.behaviors
    }

    /// Returns `true` if the setting overrides a base declaration.
    pub fn is_override(&self) -> bool {
        self.overrides
    }

    /// Returns the default, or `None` for computed settings.
    pub fn default_value(&self) -> Option<&Value> {
        match &self.default {
            SettingDefault::Value(v) => Some(v),
            SettingDefault::Computed(_) => None,
        }
    }

    /// Returns where the value comes from when it has not been written.
    pub fn default_source(&self) -> &SettingDefault {
        &self.default
    }

    /// Returns `true` for computed settings.
    pub fn is_computed(&self) -> bool {
        matches!(self.default, SettingDefault::Computed(_))
    }
}

impl fmt::Debug for Setting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Setting")
            .field("name", &self.name)
            .field("default", &self.default)
            .field("type_hint", &self.type_hint)
            .field("validators", &self.validators)
            .field("behaviors", &self.behaviors)
            .field("override", &self.overrides)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ValidationError;
    use crate::ports::{validator_fn, AccessContext};

    #[test]
    fn test_new_setting_is_unbound() {
        let setting = Setting::new(8080);
        assert_eq!(setting.name(), "");
        assert_eq!(setting.type_hint(), &TypeHint::Infer);
        assert_eq!(setting.default_value(), Some(&Value::Int(8080)));
        assert!(!setting.is_override());
        assert!(!setting.is_computed());
    }

    #[test]
    fn test_bind_once() {
        let mut setting = Setting::new(1);
        setting.bind("PORT").unwrap();
        assert_eq!(setting.name(), "PORT");
        setting.bind("PORT").unwrap();
        let err = setting.bind("OTHER").unwrap_err();
        assert!(matches!(err, SettingsError::Definition { .. }));
        assert_eq!(setting.name(), "PORT");
    }

    #[test]
    fn test_bound_setting_cannot_be_declared_under_another_name() {
        let mut setting = Setting::new(1);
        setting.bind("PORT").unwrap();
        let err = crate::domain::SettingsType::builder("App")
            .setting("OTHER", setting)
            .build()
            .unwrap_err();
        assert!(matches!(err, SettingsError::Definition { .. }));
    }

    #[test]
    fn test_class_level_read_returns_default() {
        let setting = Setting::new("localhost");
        assert_eq!(setting.read(None).unwrap(), Value::from("localhost"));
        let computed = Setting::computed(|_| Ok(Value::from(1)));
        assert_eq!(computed.read(None).unwrap(), Value::Undefined);
    }

    #[test]
    fn test_validators_keep_order() {
        let first = validator_fn(|_, _| Err(ValidationError::new("first")));
        let second = validator_fn(|_, _| Err(ValidationError::new("second")));
        let mut setting = Setting::new(1).with_validators(vec![second]);
        setting.prepend_validator(first);
        assert_eq!(setting.validators().len(), 2);
        assert!(setting.validators()[0].describe().contains("closure"));
    }

    struct MarkOverride;

    impl Behavior for MarkOverride {
        fn attach(&self, setting: &mut Setting) {
            setting.mark_override();
        }
    }

    #[test]
    fn test_with_behavior_attaches_and_injects() {
        let setting = Setting::new(1).with_behavior(MarkOverride);
        assert!(setting.is_override());
        assert_eq!(setting.behaviors().len(), 1);

        let owner = crate::domain::SettingsType::builder("Test")
            .build()
            .unwrap()
            .instantiate()
            .unwrap();
        let ctx = AccessContext {
            setting: &setting,
            owner: &owner,
        };
        let value = setting
            .behaviors()
            .get(&ctx, &mut || Ok(Value::from(1)))
            .unwrap();
        assert_eq!(value, Value::Int(1));
    }
}
