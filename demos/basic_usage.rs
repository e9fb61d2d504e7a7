// SPDX-License-Identifier: MIT OR Apache-2.0

//! Basic usage example for the settings crate.
//!
//! This example demonstrates:
//! - Declaring settings types with nested settings and inheritance
//! - Populating them from a mapping and from environment variables
//! - Validating the result and reading the collected errors
//! - Extracting the values back into a flat mapping
//!
//! To run this example:
//! ```bash
//! # Override a few values from the environment
//! export DEBUG="true"
//! export DB_PORT="6543"
//!
//! # Run the example
//! cargo run --example basic_usage --features env
//! ```

use hexsettings::prelude::*;
use std::collections::BTreeMap;

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt::init();

    println!("=== Settings Crate: Basic Usage ===\n");

    let database = SettingsType::builder("Database")
        .value("HOST", "localhost")
        .value("PORT", 5432)
        .build()?;

    let base = SettingsType::builder("BaseSettings")
        .value("DEBUG", false)
        .typed_value("INSTANCE_ID", TypeHint::Uuid, "77e7bb7b-6a44-4069-ba04-bc4835cb31e5")
        .setting(
            "SECRET_KEY",
            Setting::undefined()
                .with_type_hint(TypeHint::Str)
                .with_behavior(Required),
        )
        .nested("DB", &database)
        .build()?;

    // Redeclaring DEBUG without a hint keeps the inherited `bool`
    let app = SettingsType::builder("AppSettings")
        .extends(&base)
        .value("DEBUG", true)
        .build()?;

    let mut settings = app.instantiate()?;

    // Example 1: Validation collects every error
    println!("--- Example 1: Validation ---");
    for message in settings.validate().messages() {
        println!("✗ {}", message);
    }

    // Example 2: Updating from a mapping
    println!("\n--- Example 2: Mapping Source ---");
    let mut values = BTreeMap::new();
    values.insert("SECRET_KEY".to_string(), Value::from("s3cr3t"));
    settings.update(values)?;
    println!("✓ valid after update: {}", settings.is_valid());

    // Example 3: Updating from environment variables
    println!("\n--- Example 3: Environment Variables ---");
    settings.update(SourceSpec::source(EnvVarSource::new()))?;
    println!("  DEBUG = {:?}", settings.get("DEBUG")?);
    if let Some(db) = settings.nested("DB") {
        println!("  DB.PORT = {:?}", db.get("PORT")?);
    }

    // Example 4: Extracting values
    println!("\n--- Example 4: Extracted Values ---");
    for (key, value) in settings.extract()? {
        println!("  {} = {:?}", key, value);
    }

    Ok(())
}
