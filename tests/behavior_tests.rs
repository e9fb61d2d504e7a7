// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tests for behavior chains and the built-in behaviors.

mod common;

use common::{capture_logs, count_warnings};
use hexsettings::adapters::{Deprecated, Required, Validate};
use hexsettings::domain::{Result, Setting, SettingsType, TypeHint, ValidationError, Value};
use hexsettings::ports::{validator_fn, AccessContext, Behavior};
use std::sync::{Arc, Mutex};

/// Appends a tag to string values on read and records the call order.
struct Tag {
    tag: &'static str,
    calls: Arc<Mutex<Vec<&'static str>>>,
}

impl Behavior for Tag {
    fn get_value(
        &self,
        _ctx: &AccessContext<'_>,
        next: &mut dyn FnMut() -> Result<Value>,
    ) -> Result<Value> {
        self.calls.lock().unwrap().push(self.tag);
        let value = next()?;
        Ok(match value.as_str() {
            Some(s) => Value::from(format!("{}-{}", s, self.tag)),
            None => value,
        })
    }
}

/// Upper-cases string values on write.
struct Shout;

impl Behavior for Shout {
    fn set_value(
        &self,
        _ctx: &AccessContext<'_>,
        value: Value,
        next: &mut dyn FnMut(Value) -> Result<()>,
    ) -> Result<()> {
        match value.as_str() {
            Some(s) => next(Value::from(s.to_uppercase())),
            None => next(value),
        }
    }
}

#[test]
fn test_last_applied_behavior_runs_outermost() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let ty = SettingsType::builder("App")
        .setting(
            "NAME",
            Setting::new("v")
                .with_behavior(Tag {
                    tag: "a",
                    calls: Arc::clone(&calls),
                })
                .with_behavior(Tag {
                    tag: "b",
                    calls: Arc::clone(&calls),
                }),
        )
        .build()
        .unwrap();

    let settings = ty.instantiate().unwrap();
    assert_eq!(settings.get("NAME").unwrap(), Value::from("v-a-b"));
    assert_eq!(*calls.lock().unwrap(), vec!["b", "a"]);
}

#[test]
fn test_write_interception() {
    let ty = SettingsType::builder("App")
        .setting("NAME", Setting::new("x").with_behavior(Shout))
        .build()
        .unwrap();

    let mut settings = ty.instantiate().unwrap();
    settings.set("NAME", "hello").unwrap();
    assert_eq!(settings.get("NAME").unwrap(), Value::from("HELLO"));

    // Updates write through the chain too
    let mut values = std::collections::BTreeMap::new();
    values.insert("NAME".to_string(), Value::from("from map"));
    settings.update(values).unwrap();
    assert_eq!(settings.get("NAME").unwrap(), Value::from("FROM MAP"));
}

#[test]
fn test_required() {
    let ty = SettingsType::builder("App")
        .setting(
            "SECRET_KEY",
            Setting::undefined()
                .with_type_hint(TypeHint::Str)
                .with_behavior(Required),
        )
        .build()
        .unwrap();

    let mut settings = ty.instantiate().unwrap();
    let errors = settings.validate();
    assert!(errors.contains("SECRET_KEY"));
    assert_eq!(errors.len(), 1);

    settings.set("SECRET_KEY", "s3cr3t").unwrap();
    assert!(settings.is_valid());
}

#[test]
fn test_validate_behavior_keeps_existing_validators() {
    let short = validator_fn(|value, ctx| match value.as_str() {
        Some(s) if s.len() > 3 => Err(ValidationError::new(format!("{} is too long", ctx.name))),
        _ => Ok(()),
    });
    let ty = SettingsType::builder("App")
        .setting(
            "CODE",
            Setting::undefined()
                .with_type_hint(TypeHint::Str)
                .with_behavior(Validate::new([short]))
                .with_behavior(Required),
        )
        .build()
        .unwrap();

    let mut settings = ty.instantiate().unwrap();
    assert_eq!(settings.setting("CODE").unwrap().validators().len(), 2);

    settings.set("CODE", "abcd").unwrap();
    assert_eq!(
        settings.validate().messages(),
        vec!["CODE: CODE is too long".to_string()]
    );
}

#[test]
fn test_deprecated_warns_during_validation() {
    let ty = SettingsType::builder("App")
        .setting("OLD_PORT", Setting::new(1).with_behavior(Deprecated::new()))
        .build()
        .unwrap();
    let mut settings = ty.instantiate().unwrap();

    let (valid, logs) = capture_logs(|| settings.is_valid());
    assert!(valid);
    assert_eq!(
        count_warnings(&logs, "Setting `OLD_PORT` in class `App` is deprecated."),
        1
    );
}

#[test]
fn test_deprecated_read_warning_is_suppressed_while_validating() {
    let ty = SettingsType::builder("App")
        .setting(
            "OLD_PORT",
            Setting::new(1).with_behavior(
                Deprecated::new()
                    .with_message("{name} is going away")
                    .warn_on_get(true)
                    .warn_on_set(true),
            ),
        )
        .build()
        .unwrap();
    let mut settings = ty.instantiate().unwrap();

    let (_, logs) = capture_logs(|| settings.validate().is_empty());
    assert_eq!(count_warnings(&logs, "OLD_PORT is going away"), 1);

    let (_, logs) = capture_logs(|| settings.get("OLD_PORT").unwrap());
    assert_eq!(count_warnings(&logs, "OLD_PORT is going away"), 1);

    let (_, logs) = capture_logs(|| settings.set("OLD_PORT", 2).unwrap());
    assert_eq!(count_warnings(&logs, "OLD_PORT is going away"), 1);
}

#[test]
fn test_deprecated_as_error() {
    let ty = SettingsType::builder("App")
        .setting(
            "OLD_PORT",
            Setting::new(1).with_behavior(Deprecated::new().error_on_validation(true)),
        )
        .build()
        .unwrap();
    let mut settings = ty.instantiate().unwrap();

    let (messages, logs) = capture_logs(|| settings.validate().messages());
    assert_eq!(
        messages,
        vec!["OLD_PORT: Setting `OLD_PORT` in class `App` is deprecated.".to_string()]
    );
    assert_eq!(count_warnings(&logs, "deprecated"), 0);
}

#[test]
fn test_deprecated_silent_without_validation_warning() {
    let ty = SettingsType::builder("App")
        .setting(
            "OLD_PORT",
            Setting::new(1).with_behavior(Deprecated::new().warn_on_validation(false)),
        )
        .build()
        .unwrap();
    let mut settings = ty.instantiate().unwrap();

    let (_, logs) = capture_logs(|| {
        settings.validate();
        settings.get("OLD_PORT").unwrap()
    });
    assert_eq!(count_warnings(&logs, "deprecated"), 0);
}

/// Falls back to a sibling field when the value is empty, and rejects writes equal to it.
struct FallbackTo(&'static str);

impl Behavior for FallbackTo {
    fn get_value(
        &self,
        ctx: &AccessContext<'_>,
        next: &mut dyn FnMut() -> Result<Value>,
    ) -> Result<Value> {
        let value = next()?;
        match value.as_str() {
            Some("") => ctx.owner.get(self.0),
            _ => Ok(value),
        }
    }

    fn set_value(
        &self,
        ctx: &AccessContext<'_>,
        value: Value,
        next: &mut dyn FnMut(Value) -> Result<()>,
    ) -> Result<()> {
        if ctx.owner.get(self.0)? == value {
            return next(Value::from(""));
        }
        next(value)
    }
}

#[test]
fn test_behavior_reads_sibling_field() {
    let ty = SettingsType::builder("App")
        .value("HOST", "localhost")
        .setting("PUBLIC_HOST", Setting::new("").with_behavior(FallbackTo("HOST")))
        .build()
        .unwrap();
    let mut settings = ty.instantiate().unwrap();
    assert_eq!(settings.get("PUBLIC_HOST").unwrap(), Value::from("localhost"));

    settings.set("HOST", "internal").unwrap();
    assert_eq!(settings.get("PUBLIC_HOST").unwrap(), Value::from("internal"));

    settings.set("PUBLIC_HOST", "example.org").unwrap();
    assert_eq!(settings.get("PUBLIC_HOST").unwrap(), Value::from("example.org"));

    // Writing the sibling's value stores the empty marker
    settings.set("PUBLIC_HOST", "internal").unwrap();
    settings.set("HOST", "other").unwrap();
    assert_eq!(settings.get("PUBLIC_HOST").unwrap(), Value::from("other"));
}
