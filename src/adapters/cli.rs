// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command-line argument settings source adapter.
//!
//! This module provides a source that reads setting values from command-line
//! arguments.

use crate::adapters::convert::convert_str;
use crate::domain::{Result, Setting, Value};
use crate::ports::Source;
use std::collections::HashMap;

/// Settings source for command-line arguments.
///
/// A setting is addressed by its dotted path, matched case-insensitively: `DB.HOST`
/// is set by `--db.host`. Supported argument formats:
/// - `--key=value`: Long form with equals sign
/// - `--key value`: Long form with space-separated value
/// - `-k value`: Short form with space-separated value
///
/// Values are converted according to the setting's type hint, see [`convert_str`].
///
/// # Examples
///
/// ```rust
/// use hexsettings::adapters::CommandLineSource;
///
/// let args = vec!["--db.host=localhost", "--port", "5432"];
/// let source = CommandLineSource::from_args(args);
/// assert_eq!(source.raw("DB.HOST"), Some("localhost"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct CommandLineSource {
    /// Parsed values keyed by lower-cased dotted path
    values: HashMap<String, String>,
}

impl CommandLineSource {
    /// Creates a new command-line source with no arguments.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new command-line source from a vector of arguments.
    pub fn from_args<S: AsRef<str>>(args: Vec<S>) -> Self {
        let mut source = Self::new();
        source.parse_args(&args);
        source
    }

    /// Creates a new command-line source from the process's command-line arguments.
    ///
    /// This skips the first argument (the program name) and parses the rest.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use hexsettings::adapters::CommandLineSource;
    ///
    /// let source = CommandLineSource::from_env_args();
    /// ```
    pub fn from_env_args() -> Self {
        let args: Vec<String> = std::env::args().skip(1).collect();
        Self::from_args(args)
    }

    /// Returns the unconverted value given for a dotted path.
    pub fn raw(&self, path: &str) -> Option<&str> {
        self.values.get(&path.to_lowercase()).map(String::as_str)
    }

    /// Returns the number of parsed values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if no value was parsed.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn insert(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_lowercase(), value.to_string());
    }

    /// Parses command-line arguments and populates the values map.
    fn parse_args<S: AsRef<str>>(&mut self, args: &[S]) {
        let mut i = 0;
        while i < args.len() {
            let arg = args[i].as_ref();
            let next = args.get(i + 1).map(AsRef::as_ref);

            if let Some(long) = arg.strip_prefix("--") {
                // Handle --key=value format
                if let Some((key, value)) = long.split_once('=') {
                    self.insert(key, value);
                    i += 1;
                    continue;
                }
                // Handle --key value format
                match next {
                    Some(value) if !value.starts_with('-') => {
                        self.insert(long, value);
                        i += 2;
                    }
                    _ => i += 1,
                }
            } else if let Some(short) = arg.strip_prefix('-').filter(|s| s.len() == 1) {
                // Handle -k value format (single character short form)
                match next {
                    Some(value) if !value.starts_with('-') => {
                        self.insert(short, value);
                        i += 2;
                    }
                    _ => i += 1,
                }
            } else {
                i += 1;
            }
        }

        tracing::debug!("Parsed {} command-line values", self.values.len());
    }
}

impl Source for CommandLineSource {
    fn name(&self) -> &str {
        "cli"
    }

    fn read(&self, setting: &Setting, parents: &[String]) -> Result<Option<Value>> {
        let mut path = parents.join(".");
        if !path.is_empty() {
            path.push('.');
        }
        path.push_str(setting.name());

        Ok(self
            .raw(&path)
            .map(|raw| convert_str(raw, setting.type_hint())))
    }
}
