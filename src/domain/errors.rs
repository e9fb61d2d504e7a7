// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the settings crate.
//!
//! This module defines the error types that can occur while declaring settings types,
//! validating settings and reading values from sources. All errors use `thiserror`
//! for proper error handling and conversion, except [`ValidationError`] which renders
//! its field path itself.

use std::fmt;
use thiserror::Error;

/// The main error type for settings operations.
///
/// This enum represents all possible errors that can occur when declaring a settings
/// type, accessing its values, validating it in fail-fast mode or updating it from a
/// source. It is marked as `#[non_exhaustive]` to allow for future additions without
/// breaking backwards compatibility.
///
/// # Examples
///
/// ```
/// use hexsettings::domain::errors::SettingsError;
///
/// fn lookup() -> Result<(), SettingsError> {
///     Err(SettingsError::UnknownSetting {
///         type_name: "AppSettings".to_string(),
///         name: "PORT".to_string(),
///     })
/// }
/// assert!(lookup().unwrap_err().to_string().contains("PORT"));
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SettingsError {
    /// A settings type redeclares a field incompatibly somewhere in its inheritance chain.
    #[error("Settings structure error: {message}")]
    Structure {
        /// Description of the inconsistency
        message: String,
    },

    /// A setting or settings type was declared incorrectly.
    #[error("Invalid settings definition: {message}")]
    Definition {
        /// Description of the problem
        message: String,
    },

    /// The requested setting is not declared on the settings type.
    #[error("Settings type '{type_name}' has no setting named '{name}'")]
    UnknownSetting {
        /// Name of the settings type
        type_name: String,
        /// The requested setting name
        name: String,
    },

    /// A computed setting was written to.
    #[error("Can't set attribute: computed setting '{name}' cannot be set")]
    ReadOnlySetting {
        /// The setting name
        name: String,
    },

    /// Validation failed in fail-fast mode.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// An error occurred in a settings source.
    #[error("Settings source '{source_name}' error: {message}")]
    SourceError {
        /// The name of the source that encountered the error
        source_name: String,
        /// The error message
        message: String,
        /// The underlying error, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Failed to parse a settings file or value.
    #[error("Failed to parse settings: {message}")]
    ParseError {
        /// The error message
        message: String,
        /// The underlying parsing error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// No registered source factory can handle the given source specifier.
    #[error("No suitable source found to handle \"{spec}\". Perhaps you have forgotten to register the source?")]
    NoSuitableSource {
        /// Description of the source specifier
        spec: String,
    },

    /// Two values could not be combined by an update strategy.
    #[error("Cannot {operation} values of type `{left}` and `{right}`")]
    IncompatibleValues {
        /// The attempted operation
        operation: &'static str,
        /// Type of the current value
        left: String,
        /// Type of the incoming value
        right: String,
    },

    /// Applying an update strategy to a setting failed.
    #[error("Failed to update setting '{setting}': {source}")]
    Update {
        /// Dotted path of the setting
        setting: String,
        /// The underlying error
        source: Box<SettingsError>,
    },

    /// An I/O error occurred while reading settings.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl SettingsError {
    /// Creates a `Definition` error from a message.
    pub fn definition(message: impl Into<String>) -> Self {
        SettingsError::Definition {
            message: message.into(),
        }
    }

    /// Creates a `SourceError` without an underlying cause.
    pub fn source_error(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        SettingsError::SourceError {
            source_name: source_name.into(),
            message: message.into(),
            source: None,
        }
    }
}

/// A specialized Result type for settings operations.
pub type Result<T> = std::result::Result<T, SettingsError>;

/// The error raised by validators and the whole-object validation hook.
///
/// A validation error carries a message and the path of field names it
/// originated from. The path is empty when a validator raises it and is
/// extended from the inside out while the error propagates through nested
/// settings in fail-fast mode.
///
/// # Examples
///
/// ```
/// use hexsettings::domain::ValidationError;
///
/// let err = ValidationError::new("expected string")
///     .prepend_path("HOST")
///     .prepend_path("DATABASE");
/// assert_eq!(err.to_string(), "DATABASE.HOST: expected string");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationError {
    message: String,
    path: Vec<String>,
}

impl ValidationError {
    /// Creates a validation error with an empty path.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            path: Vec::new(),
        }
    }

    /// Prepends a field name to the error path.
    pub fn prepend_path(mut self, name: impl Into<String>) -> Self {
        self.path.insert(0, name.into());
        self
    }

    /// Returns the undecorated message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the field path, outermost first.
    pub fn path(&self) -> &[String] {
        &self.path
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path.join("."), self.message)
        }
    }
}

impl std::error::Error for ValidationError {}
