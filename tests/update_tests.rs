// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tests for the update pass and the source registry.

mod common;

use common::MockSource;
use hexsettings::adapters::MapSource;
use hexsettings::domain::{strategies, Result, SettingsError, SettingsType, Strategies, TypeHint, Value};
use hexsettings::service::{get_source, SourceSpec};
use std::collections::BTreeMap;
use std::sync::Arc;

fn app() -> Arc<SettingsType> {
    let db = SettingsType::builder("Db")
        .value("HOST", "localhost")
        .value("PORT", 5432)
        .build()
        .unwrap();
    SettingsType::builder("App")
        .value("DEBUG", false)
        .value("TAGS", vec!["base"])
        .nested("DB", &db)
        .computed("SUMMARY", TypeHint::Str, |s| {
            Ok(Value::from(format!("debug={:?}", s.get("DEBUG")?.as_bool())))
        })
        .build()
        .unwrap()
}

#[test]
fn test_reads_every_plain_setting_with_parents() {
    let source = MockSource::new();
    let mut settings = app().instantiate().unwrap();
    settings.update_from(&source, &Strategies::new()).unwrap();

    assert_eq!(source.reads(), vec!["DEBUG", "TAGS", "DB.HOST", "DB.PORT"]);
}

#[test]
fn test_missing_values_are_left_alone() {
    let source = MockSource::new().with("DB.PORT", 6543);
    let mut settings = app().instantiate().unwrap();
    settings.update_from(&source, &Strategies::new()).unwrap();

    let db = settings.nested("DB").unwrap();
    assert_eq!(db.get("PORT").unwrap(), Value::Int(6543));
    assert_eq!(db.get("HOST").unwrap(), Value::from("localhost"));
    assert_eq!(settings.get("DEBUG").unwrap(), Value::Bool(false));
}

#[test]
fn test_computed_settings_are_not_read() {
    let source = MockSource::new()
        .with("SUMMARY", "ignored")
        .with("DEBUG", true);
    let mut settings = app().instantiate().unwrap();
    settings.update_from(&source, &Strategies::new()).unwrap();

    assert!(!source.reads().contains(&"SUMMARY".to_string()));
    assert_eq!(settings.get("SUMMARY").unwrap(), Value::from("debug=Some(true)"));
}

#[test]
fn test_append_and_prepend() {
    let source = MockSource::new().with("TAGS", vec!["extra"]);

    let mut appended = app().instantiate().unwrap();
    appended
        .update_from(&source, &Strategies::new().with("TAGS", strategies::append))
        .unwrap();
    assert_eq!(appended.get("TAGS").unwrap(), Value::from(vec!["base", "extra"]));

    let mut prepended = app().instantiate().unwrap();
    prepended
        .update_from(&source, &Strategies::new().with("TAGS", strategies::prepend))
        .unwrap();
    assert_eq!(prepended.get("TAGS").unwrap(), Value::from(vec!["extra", "base"]));
}

#[test]
fn test_strategy_keys_are_full_paths() {
    let source = MockSource::new().with("DB.HOST", ".internal");
    let mut settings = app().instantiate().unwrap();

    // A bare name does not match the nested setting
    settings
        .update_from(&source, &Strategies::new().with("HOST", strategies::append))
        .unwrap();
    assert_eq!(
        settings.nested("DB").unwrap().get("HOST").unwrap(),
        Value::from(".internal")
    );

    settings
        .update_from(&source, &Strategies::new().with("DB.HOST", strategies::prepend))
        .unwrap();
    assert_eq!(
        settings.nested("DB").unwrap().get("HOST").unwrap(),
        Value::from(".internal.internal")
    );
}

#[test]
fn test_custom_strategy() {
    fn max(current: Value, incoming: Value) -> Result<Value> {
        match (current.as_int(), incoming.as_int()) {
            (Some(a), Some(b)) => Ok(Value::Int(a.max(b))),
            _ => Ok(incoming),
        }
    }

    let source = MockSource::new().with("DB.PORT", 80);
    let mut settings = app().instantiate().unwrap();
    settings
        .update_from(&source, &Strategies::new().with("DB.PORT", max))
        .unwrap();
    assert_eq!(
        settings.nested("DB").unwrap().get("PORT").unwrap(),
        Value::Int(5432)
    );
}

#[test]
fn test_incompatible_strategy_reports_setting() {
    let source = MockSource::new().with("DB.PORT", "x");
    let mut settings = app().instantiate().unwrap();
    let err = settings
        .update_from(&source, &Strategies::new().with("DB.PORT", strategies::append))
        .unwrap_err();

    assert!(matches!(err, SettingsError::Update { ref setting, .. } if setting == "DB.PORT"));
    assert!(err
        .to_string()
        .contains("Cannot concatenate values of type `int` and `str`"));
}

#[test]
fn test_nested_map_source() {
    let mut db = BTreeMap::new();
    db.insert("HOST".to_string(), Value::from("db"));
    let mut values = BTreeMap::new();
    values.insert("DB".to_string(), Value::from(db));
    values.insert("UNRELATED".to_string(), Value::from(1));

    let mut settings = app().instantiate().unwrap();
    settings.update(values).unwrap();
    assert_eq!(
        settings.nested("DB").unwrap().get("HOST").unwrap(),
        Value::from("db")
    );
}

#[test]
fn test_ready_made_source_passes_through_registry() {
    let source = get_source(SourceSpec::source(MapSource::default().with_value("DEBUG", true)))
        .unwrap();
    assert_eq!(source.name(), "map");

    let mut settings = app().instantiate().unwrap();
    settings
        .update_from(source.as_ref(), &Strategies::new())
        .unwrap();
    assert_eq!(settings.get("DEBUG").unwrap(), Value::Bool(true));
}
