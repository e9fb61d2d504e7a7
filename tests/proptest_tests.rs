// SPDX-License-Identifier: MIT OR Apache-2.0

//! Property-based tests using proptest.
//!
//! These tests check that value conversion, type inference and the update strategies
//! behave consistently for arbitrary inputs.

use hexsettings::adapters::convert::convert_str;
use hexsettings::adapters::EnvVarSource;
use hexsettings::domain::{strategies, SettingsType, TypeHint, ValidationError, Value};
use proptest::prelude::*;

// Integers survive conversion from their decimal representation
proptest! {
    #[test]
    fn test_convert_any_i64(n in any::<i64>()) {
        prop_assert_eq!(convert_str(&n.to_string(), &TypeHint::Int), Value::Int(n));
    }
}

// Strings that are not numbers are kept as they are
proptest! {
    #[test]
    fn test_convert_keeps_unconvertible_strings(s in "[a-z][a-z ]{0,20}") {
        prop_assume!(!["true", "yes", "on", "false", "no", "off"].contains(&s.as_str()));
        prop_assert_eq!(convert_str(&s, &TypeHint::Int), Value::from(s.clone()));
        prop_assert_eq!(convert_str(&s, &TypeHint::Str), Value::from(s));
    }
}

// A guessed hint always accepts the value it was guessed from
proptest! {
    #[test]
    fn test_guessed_hint_accepts_value(
        value in prop_oneof![
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(Value::Int),
            any::<f64>().prop_map(Value::Float),
            "\\PC*".prop_map(Value::from),
            prop::collection::vec(any::<i64>(), 0..5).prop_map(Value::from),
        ]
    ) {
        prop_assert!(TypeHint::guess(&value).accepts(&value));
    }
}

// Appending lists keeps every element in order
proptest! {
    #[test]
    fn test_append_list_lengths(
        a in prop::collection::vec(any::<i64>(), 0..10),
        b in prop::collection::vec(any::<i64>(), 0..10),
    ) {
        let first = Value::from(a.clone());
        let second = Value::from(b.clone());

        let appended = strategies::append(first.clone(), second.clone()).unwrap();
        let list = appended.as_list().unwrap();
        prop_assert_eq!(list.len(), a.len() + b.len());
        prop_assert_eq!(&list[..a.len()], first.as_list().unwrap());

        let prepended = strategies::prepend(first, second.clone()).unwrap();
        let list = prepended.as_list().unwrap();
        prop_assert_eq!(&list[..b.len()], second.as_list().unwrap());
    }
}

// Paths are rendered outermost first
proptest! {
    #[test]
    fn test_prepend_path(names in prop::collection::vec("[A-Z]{1,8}", 1..5)) {
        let mut error = ValidationError::new("bad");
        for name in names.iter().rev() {
            error = error.prepend_path(name.clone());
        }
        prop_assert_eq!(error.path(), &names[..]);
        prop_assert_eq!(error.to_string(), format!("{}: bad", names.join(".")));
    }
}

// Environment variable names join the prefix, parents and name with underscores
proptest! {
    #[test]
    fn test_env_variable_name(
        prefix in "[A-Z]{0,4}",
        parents in prop::collection::vec("[a-z]{1,6}", 0..3),
        name in "[a-z]{1,6}",
    ) {
        let source = EnvVarSource::with_prefix(prefix.clone());
        let key = source.variable_name(&name, &parents);

        let mut expected = prefix;
        for parent in &parents {
            expected.push_str(&parent.to_uppercase());
            expected.push('_');
        }
        expected.push_str(&name.to_uppercase());
        prop_assert_eq!(key, expected);
    }
}

// Values written through `set` are read back unchanged
proptest! {
    #[test]
    fn test_set_then_get(n in any::<i64>(), s in "\\PC*") {
        let ty = SettingsType::builder("App")
            .value("NUMBER", 0)
            .value("TEXT", "")
            .build()
            .unwrap();
        let mut settings = ty.instantiate().unwrap();
        settings.set("NUMBER", n).unwrap();
        settings.set("TEXT", s.clone()).unwrap();

        prop_assert_eq!(settings.get("NUMBER").unwrap(), Value::Int(n));
        prop_assert_eq!(settings.get("TEXT").unwrap(), Value::from(s));
        prop_assert!(settings.is_valid());
    }
}
