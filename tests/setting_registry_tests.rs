// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tests for the process-wide setting registry and the UUID setting.

use hexsettings::domain::{Setting, SettingsType, TypeHint, Value};
use hexsettings::service::{register_setting, unregister_setting};
use std::collections::BTreeMap;

const ID: &str = "77e7bb7b-6a44-4069-ba04-bc4835cb31e5";

fn tagged(value: Value) -> Setting {
    Setting::new(value).with_doc("tagged frozenset")
}

#[test]
fn test_registered_setting_applies_to_typed_values_only() {
    let previous = register_setting(TypeHint::FrozenSet, tagged);

    let ty = SettingsType::builder("App")
        .typed_value("TAGS", TypeHint::FrozenSet, Value::FrozenSet(vec![]))
        .setting(
            "EXPLICIT",
            Setting::new(Value::FrozenSet(vec![])).with_type_hint(TypeHint::FrozenSet),
        )
        .build();

    match previous {
        Some(factory) => {
            register_setting(TypeHint::FrozenSet, factory);
        }
        None => {
            unregister_setting(&TypeHint::FrozenSet);
        }
    }

    let ty = ty.unwrap();
    assert_eq!(ty.field("TAGS").unwrap().doc(), "tagged frozenset");
    assert_eq!(ty.field("EXPLICIT").unwrap().doc(), "");
}

#[test]
fn test_typed_uuid_value_parses_strings() {
    let ty = SettingsType::builder("App")
        .typed_value("ID", TypeHint::Uuid, Value::Undefined)
        .build()
        .unwrap();
    let mut settings = ty.instantiate().unwrap();

    let mut values = BTreeMap::new();
    values.insert("ID".to_string(), Value::from(ID));
    settings.update(values).unwrap();

    let id = settings.get("ID").unwrap().as_uuid().unwrap();
    assert_eq!(id.to_string(), ID);
    assert!(settings.is_valid());
}

#[test]
fn test_typed_uuid_value_keeps_invalid_strings() {
    let ty = SettingsType::builder("App")
        .typed_value("ID", TypeHint::Uuid, ID)
        .build()
        .unwrap();
    let mut settings = ty.instantiate().unwrap();
    assert!(settings.get("ID").unwrap().as_uuid().is_some());

    settings.set("ID", "77e7bb7b-6a44-4069-ba04").unwrap();
    assert_eq!(settings.get("ID").unwrap(), Value::from("77e7bb7b-6a44-4069-ba04"));

    let errors = settings.validate();
    assert!(errors.contains("ID"));
    assert_eq!(errors.len(), 1);
}
