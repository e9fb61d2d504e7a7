// SPDX-License-Identifier: MIT OR Apache-2.0

//! Settings types and their instances.
//!
//! A [`SettingsType`] is declared once through a [`SettingsTypeBuilder`]. Building it
//! binds setting names, resolves inferred type hints, linearises the base types and
//! checks that no field changes its type along the inheritance chain without an
//! explicit override. The result is an immutable, shareable field table.
//!
//! A [`Settings`] instance owns one value slot per field of its type. Reads and writes
//! go through the behavior chain of the field.

use crate::adapters::validators::ValueTypeValidator;
use crate::domain::error_details::ValidationErrors;
use crate::domain::errors::{Result, SettingsError, ValidationError};
use crate::domain::setting::{Setting, SettingDefault};
use crate::domain::type_hint::TypeHint;
use crate::domain::value::Value;
use crate::ports::{AccessContext, Validator};
use crate::service::setting_for;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

/// The whole-object validation hook of a settings type.
pub type ValidateHook =
    Arc<dyn Fn(&Settings) -> std::result::Result<(), ValidationError> + Send + Sync>;

/// An immutable, compiled settings type.
///
/// # Examples
///
/// ```
/// use hexsettings::domain::{SettingsType, Value};
///
/// let app = SettingsType::builder("AppSettings")
///     .value("HOST", "localhost")
///     .value("PORT", 8080)
///     .build()
///     .unwrap();
///
/// let mut settings = app.instantiate().unwrap();
/// assert_eq!(settings.get("PORT").unwrap(), Value::Int(8080));
/// settings.set("PORT", 9090).unwrap();
/// assert_eq!(settings.get("PORT").unwrap(), Value::Int(9090));
/// ```
pub struct SettingsType {
    name: String,
    bases: Vec<Arc<SettingsType>>,
    mro: Vec<Arc<SettingsType>>,
    declared: Vec<Setting>,
    fields: Vec<Setting>,
    index: HashMap<String, usize>,
    own_default_validators: Option<Vec<Arc<dyn Validator>>>,
    own_mandatory_validators: Option<Vec<Arc<dyn Validator>>>,
    own_validate_hook: Option<ValidateHook>,
    default_validators: Vec<Arc<dyn Validator>>,
    mandatory_validators: Vec<Arc<dyn Validator>>,
    validate_hook: Option<ValidateHook>,
}

impl SettingsType {
    /// Starts declaring a new settings type.
    pub fn builder(name: impl Into<String>) -> SettingsTypeBuilder {
        SettingsTypeBuilder::new(name)
    }

    /// Creates a new instance of this type.
    pub fn instantiate(self: &Arc<Self>) -> Result<Settings> {
        Settings::new(self)
    }

    /// Returns the type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the direct base types in declaration order.
    pub fn bases(&self) -> &[Arc<SettingsType>] {
        &self.bases
    }

    /// Returns all ancestors, most-derived first, excluding this type.
    pub fn ancestors(&self) -> &[Arc<SettingsType>] {
        &self.mro
    }

    /// Returns `true` if this type is `name` or derives from it.
    pub fn is_a(&self, name: &str) -> bool {
        self.name == name || self.mro.iter().any(|t| t.name == name)
    }

    /// Returns the settings declared by this type itself.
    pub fn declared(&self) -> &[Setting] {
        &self.declared
    }

    /// Returns the declaration of a field of this type, own or inherited.
    pub fn field(&self, name: &str) -> Option<&Setting> {
        self.index.get(name).map(|&i| &self.fields[i])
    }

    /// Returns all fields, most-base declarations first.
    pub fn fields(&self) -> &[Setting] {
        &self.fields
    }

    /// Validators used for fields without validators of their own.
    pub fn default_validators(&self) -> &[Arc<dyn Validator>] {
        &self.default_validators
    }

    /// Validators run after the field's own or default validators.
    pub fn mandatory_validators(&self) -> &[Arc<dyn Validator>] {
        &self.mandatory_validators
    }

    /// The whole-object validation hook, own or inherited.
    pub fn validate_hook(&self) -> Option<&ValidateHook> {
        self.validate_hook.as_ref()
    }

    pub(crate) fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    fn declared_setting(&self, name: &str) -> Option<&Setting> {
        self.declared.iter().find(|s| s.name() == name)
    }

    /// Checks that every redeclared field keeps the type of its previous declaration.
    ///
    /// The chain is walked from the most-base type to this one. A declaration marked as
    /// an override is not compared with the one before it.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Structure`] naming both types and both hints.
    pub fn verify_structure(&self) -> Result<()> {
        let chain: Vec<&SettingsType> = self
            .mro
            .iter()
            .rev()
            .map(|t| &**t)
            .chain(std::iter::once(self))
            .collect();

        for field in &self.fields {
            let name = field.name();
            let levels: Vec<(&SettingsType, &Setting)> = chain
                .iter()
                .filter_map(|t| t.declared_setting(name).map(|s| (*t, s)))
                .collect();

            for pair in levels.windows(2) {
                let (c0, s0) = pair[0];
                let (c1, s1) = pair[1];
                if s1.is_override() {
                    continue;
                }
                if s0.type_hint() != s1.type_hint() {
                    return Err(SettingsError::Structure {
                        message: format!(
                            "in classes {} and {} setting {} has the following difference(s): types differ: {} != {}",
                            c0.name,
                            c1.name,
                            name,
                            s0.type_hint(),
                            s1.type_hint()
                        ),
                    });
                }
            }
        }

        tracing::debug!(
            settings_type = %self.name,
            levels = chain.len(),
            "verified settings structure"
        );
        Ok(())
    }
}

impl fmt::Debug for SettingsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bases: Vec<&str> = self.bases.iter().map(|b| b.name()).collect();
        f.debug_struct("SettingsType")
            .field("name", &self.name)
            .field("bases", &bases)
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

/// Declares a [`SettingsType`].
///
/// Declaration problems (duplicate names, an invalid prefix, a nested type that
/// cannot be instantiated) are reported by [`build`](Self::build).
pub struct SettingsTypeBuilder {
    name: String,
    bases: Vec<Arc<SettingsType>>,
    declared: Vec<(String, Setting)>,
    prefix: Option<String>,
    default_validators: Option<Vec<Arc<dyn Validator>>>,
    mandatory_validators: Option<Vec<Arc<dyn Validator>>>,
    validate_hook: Option<ValidateHook>,
    error: Option<SettingsError>,
}

impl SettingsTypeBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bases: Vec::new(),
            declared: Vec::new(),
            prefix: None,
            default_validators: None,
            mandatory_validators: None,
            validate_hook: None,
            error: None,
        }
    }

    /// Adds a base type. May be called repeatedly for multiple inheritance.
    pub fn extends(mut self, base: &Arc<SettingsType>) -> Self {
        self.bases.push(Arc::clone(base));
        self
    }

    /// Declares a setting explicitly.
    pub fn setting(mut self, name: impl Into<String>, setting: Setting) -> Self {
        let name = name.into();
        if self.declared.iter().any(|(n, _)| *n == name) {
            self.fail(SettingsError::definition(format!(
                "setting `{}` is declared twice in `{}`",
                name, self.name
            )));
        } else {
            self.declared.push((name, setting));
        }
        self
    }

    /// Declares a plain attribute.
    ///
    /// Only shout-case names (all upper case, not starting with an underscore) become
    /// settings; other attributes are ignored.
    pub fn value(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let name = name.into();
        if is_setting_name(&name) {
            self.setting(name, Setting::new(value))
        } else {
            tracing::debug!(attribute = %name, "ignoring non-setting attribute");
            self
        }
    }

    /// Declares a plain attribute with an explicit type annotation.
    ///
    /// The setting is built by the factory registered for the hint, see
    /// [`register_setting`](crate::service::register_setting).
    pub fn typed_value(
        self,
        name: impl Into<String>,
        type_hint: TypeHint,
        value: impl Into<Value>,
    ) -> Self {
        let name = name.into();
        if is_setting_name(&name) {
            let setting = setting_for(&type_hint, value).with_type_hint(type_hint);
            self.setting(name, setting)
        } else {
            tracing::debug!(attribute = %name, "ignoring non-setting attribute");
            self
        }
    }

    /// Declares a computed setting, re-evaluated on every read.
    pub fn computed<F>(self, name: impl Into<String>, type_hint: TypeHint, f: F) -> Self
    where
        F: Fn(&Settings) -> Result<Value> + Send + Sync + 'static,
    {
        self.setting(name, Setting::computed(f).with_type_hint(type_hint))
    }

    /// Declares a nested settings field holding a fresh instance of `ty`.
    pub fn nested(mut self, name: impl Into<String>, ty: &Arc<SettingsType>) -> Self {
        match ty.instantiate() {
            Ok(instance) => self.setting(name, Setting::new(instance)),
            Err(e) => {
                self.fail(e);
                self
            }
        }
    }

    /// Replaces the validators used for fields without validators of their own.
    pub fn default_validators<I>(mut self, validators: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn Validator>>,
    {
        self.default_validators = Some(validators.into_iter().collect());
        self
    }

    /// Replaces the validators that run for every field.
    pub fn mandatory_validators<I>(mut self, validators: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn Validator>>,
    {
        self.mandatory_validators = Some(validators.into_iter().collect());
        self
    }

    /// Sets the whole-object validation hook.
    ///
    /// The hook runs after all fields validated without errors.
    pub fn validate_with<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Settings) -> std::result::Result<(), ValidationError> + Send + Sync + 'static,
    {
        self.validate_hook = Some(Arc::new(hook));
        self
    }

    /// Renames every locally declared setting to `PREFIX_NAME`.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    fn fail(&mut self, error: SettingsError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    /// Compiles the settings type.
    ///
    /// # Errors
    ///
    /// - [`SettingsError::Definition`] for invalid declarations
    /// - [`SettingsError::Structure`] if the bases cannot be linearised or a field
    ///   changes its type without an override
    pub fn build(self) -> Result<Arc<SettingsType>> {
        if let Some(error) = self.error {
            return Err(error);
        }

        let declared = match &self.prefix {
            Some(prefix) => apply_prefix(prefix, self.declared)?,
            None => self.declared,
        };

        let mro = linearize(&self.name, &self.bases)?;

        let mut own = Vec::with_capacity(declared.len());
        for (name, mut setting) in declared {
            setting.bind(&name)?;
            if *setting.type_hint() == TypeHint::Infer {
                let hint = inherited_hint(&mro, &name)
                    .or_else(|| guess_hint(&setting))
                    .unwrap_or(TypeHint::Any);
                setting.set_type_hint(hint);
            }
            own.push(setting);
        }

        let mut fields: Vec<Setting> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        for level in mro.iter().rev().map(|t| t.declared.as_slice()).chain([own.as_slice()]) {
            for setting in level {
                match index.get(setting.name()) {
                    Some(&i) => fields[i] = setting.clone(),
                    None => {
                        index.insert(setting.name().to_string(), fields.len());
                        fields.push(setting.clone());
                    }
                }
            }
        }

        let default_validators = self
            .default_validators
            .clone()
            .or_else(|| mro.iter().find_map(|t| t.own_default_validators.clone()))
            .unwrap_or_else(|| vec![Arc::new(ValueTypeValidator::new()) as Arc<dyn Validator>]);
        let mandatory_validators = self
            .mandatory_validators
            .clone()
            .or_else(|| mro.iter().find_map(|t| t.own_mandatory_validators.clone()))
            .unwrap_or_default();
        let validate_hook = self
            .validate_hook
            .clone()
            .or_else(|| mro.iter().find_map(|t| t.own_validate_hook.clone()));

        let ty = SettingsType {
            name: self.name,
            bases: self.bases,
            mro,
            declared: own,
            fields,
            index,
            own_default_validators: self.default_validators,
            own_mandatory_validators: self.mandatory_validators,
            own_validate_hook: self.validate_hook,
            default_validators,
            mandatory_validators,
            validate_hook,
        };
        ty.verify_structure()?;

        tracing::debug!(
            settings_type = %ty.name,
            declared = ty.declared.len(),
            fields = ty.fields.len(),
            "compiled settings type"
        );
        Ok(Arc::new(ty))
    }
}

/// Returns `true` for names that are converted into settings implicitly.
pub fn is_setting_name(name: &str) -> bool {
    !name.is_empty() && !name.starts_with('_') && name.to_uppercase() == name
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

fn apply_prefix(prefix: &str, declared: Vec<(String, Setting)>) -> Result<Vec<(String, Setting)>> {
    if prefix.is_empty() {
        return Err(SettingsError::definition("prefix cannot be empty"));
    }
    if !is_identifier(prefix) {
        return Err(SettingsError::definition(format!(
            "prefix `{}` should be a valid identifier",
            prefix
        )));
    }

    let originals: Vec<String> = declared.iter().map(|(n, _)| n.clone()).collect();
    let mut renamed = Vec::with_capacity(declared.len());
    for (name, setting) in declared {
        let new_name = format!("{}_{}", prefix, name);
        if originals.contains(&new_name) {
            return Err(SettingsError::definition(format!(
                "settings type already has a setting named `{}`",
                new_name
            )));
        }
        renamed.push((new_name, setting));
    }
    Ok(renamed)
}

/// Hint of the nearest ancestor declaring `name`, walking the resolution order.
fn inherited_hint(mro: &[Arc<SettingsType>], name: &str) -> Option<TypeHint> {
    mro.iter()
        .find_map(|t| t.declared_setting(name).map(|s| s.type_hint().clone()))
}

/// Guesses from a defined default; `Undefined` and computed defaults give no guess.
fn guess_hint(setting: &Setting) -> Option<TypeHint> {
    match setting.default_source() {
        SettingDefault::Value(v) if !v.is_undefined() => Some(TypeHint::guess(v)),
        _ => None,
    }
}

/// C3 linearisation of the base types, most-derived first.
fn linearize(name: &str, bases: &[Arc<SettingsType>]) -> Result<Vec<Arc<SettingsType>>> {
    let mut sequences: Vec<Vec<Arc<SettingsType>>> = bases
        .iter()
        .map(|b| std::iter::once(Arc::clone(b)).chain(b.mro.iter().cloned()).collect())
        .collect();
    sequences.push(bases.to_vec());

    let mut out = Vec::new();
    loop {
        sequences.retain(|s| !s.is_empty());
        if sequences.is_empty() {
            return Ok(out);
        }

        let candidate = sequences
            .iter()
            .map(|s| &s[0])
            .find(|c| {
                !sequences
                    .iter()
                    .any(|s| s[1..].iter().any(|t| Arc::ptr_eq(t, c)))
            })
            .cloned();

        match candidate {
            Some(next) => {
                for seq in sequences.iter_mut() {
                    if Arc::ptr_eq(&seq[0], &next) {
                        seq.remove(0);
                    }
                }
                out.push(next);
            }
            None => {
                return Err(SettingsError::Structure {
                    message: format!(
                        "cannot create a consistent resolution order for the bases of {}",
                        name
                    ),
                })
            }
        }
    }
}

/// An instance of a [`SettingsType`].
///
/// Every instance owns its own value table, so instances of the same type never share
/// storage. Nested settings are deep-copied from the declared default.
#[derive(Clone)]
pub struct Settings {
    ty: Arc<SettingsType>,
    values: Vec<Option<Value>>,
    pub(crate) errors: ValidationErrors,
    pub(crate) is_being_validated: bool,
}

impl Settings {
    /// Creates an instance, re-checking the structure of its type.
    pub fn new(ty: &Arc<SettingsType>) -> Result<Self> {
        ty.verify_structure()?;
        Ok(Self {
            ty: Arc::clone(ty),
            values: ty.fields.iter().map(|f| f.default_value().cloned()).collect(),
            errors: ValidationErrors::new(),
            is_being_validated: false,
        })
    }

    /// Returns the type of this instance.
    pub fn settings_type(&self) -> &Arc<SettingsType> {
        &self.ty
    }

    /// Returns the type name.
    pub fn type_name(&self) -> &str {
        self.ty.name()
    }

    /// Returns the field names, most-base declarations first.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.ty.fields.iter().map(Setting::name)
    }

    /// Returns the declaration of a field.
    pub fn setting(&self, name: &str) -> Option<&Setting> {
        self.ty.field(name)
    }

    /// Returns the errors of the last validation pass.
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Returns `true` while a validation pass is running.
    pub fn is_being_validated(&self) -> bool {
        self.is_being_validated
    }

    fn index_of(&self, name: &str) -> Result<usize> {
        self.ty
            .index_of(name)
            .ok_or_else(|| SettingsError::UnknownSetting {
                type_name: self.ty.name.clone(),
                name: name.to_string(),
            })
    }

    fn raw_get(&self, index: usize) -> Result<Value> {
        match &self.values[index] {
            Some(value) => Ok(value.clone()),
            None => match self.ty.fields[index].default_source() {
                SettingDefault::Computed(f) => f(self),
                SettingDefault::Value(value) => Ok(value.clone()),
            },
        }
    }

    /// Reads a field through its behavior chain.
    pub fn get(&self, name: &str) -> Result<Value> {
        let index = self.index_of(name)?;
        let setting = &self.ty.fields[index];
        let ctx = AccessContext {
            setting,
            owner: self,
        };
        setting.behaviors().get(&ctx, &mut || self.raw_get(index))
    }

    /// Writes a field through its behavior chain.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::ReadOnlySetting`] for computed settings and
    /// [`SettingsError::UnknownSetting`] for names the type does not declare.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        let index = self.index_of(name)?;
        let ty = Arc::clone(&self.ty);
        let setting = &ty.fields[index];
        if setting.is_computed() {
            return Err(SettingsError::ReadOnlySetting {
                name: name.to_string(),
            });
        }

        // The chain sees `self` as owner, so the write lands after it returns
        let mut stored = None;
        let ctx = AccessContext {
            setting,
            owner: &*self,
        };
        setting.behaviors().set(&ctx, value.into(), &mut |v| {
            stored = Some(v);
            Ok(())
        })?;
        if let Some(v) = stored {
            self.values[index] = Some(v);
        }
        Ok(())
    }

    /// Returns a nested settings instance without going through behaviors.
    pub fn nested(&self, name: &str) -> Option<&Settings> {
        let index = self.ty.index_of(name)?;
        self.values[index].as_ref().and_then(Value::as_settings)
    }

    /// Returns a nested settings instance mutably.
    pub fn nested_mut(&mut self, name: &str) -> Option<&mut Settings> {
        let index = self.ty.index_of(name)?;
        self.values[index].as_mut().and_then(Value::as_settings_mut)
    }

    pub(crate) fn slot_mut(&mut self, index: usize) -> Option<&mut Value> {
        self.values.get_mut(index).and_then(Option::as_mut)
    }

    /// Flattens all values into a new map, see [`extract_to`](Self::extract_to).
    pub fn extract(&self) -> Result<BTreeMap<String, Value>> {
        let mut out = BTreeMap::new();
        self.extract_to(&mut out, "")?;
        Ok(out)
    }

    /// Flattens all values into `destination`.
    ///
    /// Names are prefixed with `prefix_` when a prefix is given; nested settings are
    /// flattened recursively with their field name appended to the prefix.
    ///
    /// ```
    /// use hexsettings::domain::{SettingsType, Value};
    ///
    /// let db = SettingsType::builder("Db").value("HOST", "localhost").build().unwrap();
    /// let app = SettingsType::builder("App").nested("DB", &db).build().unwrap();
    ///
    /// let flat = app.instantiate().unwrap().extract().unwrap();
    /// assert_eq!(flat.get("DB_HOST"), Some(&Value::from("localhost")));
    /// ```
    pub fn extract_to(&self, destination: &mut BTreeMap<String, Value>, prefix: &str) -> Result<()> {
        let prefix = if prefix.is_empty() {
            String::new()
        } else {
            format!("{}_", prefix)
        };

        for (index, setting) in self.ty.fields.iter().enumerate() {
            let var_name = format!("{}{}", prefix, setting.name());
            match self.values[index].as_ref().and_then(Value::as_settings) {
                Some(nested) => nested.extract_to(destination, &var_name)?,
                None => {
                    destination.insert(var_name, self.get(setting.name())?);
                }
            }
        }
        Ok(())
    }
}

impl PartialEq for Settings {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.ty, &other.ty) && self.values == other.values
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct(&self.ty.name);
        for (setting, value) in self.ty.fields.iter().zip(&self.values) {
            match value {
                Some(v) => s.field(setting.name(), v),
                None => s.field(setting.name(), &format_args!("<computed>")),
            };
        }
        s.finish()
    }
}
