// SPDX-License-Identifier: MIT OR Apache-2.0

//! File settings source adapter.
//!
//! [`FileSource`] reads a settings file once, through a [`ConfigParser`], and serves
//! setting values from the parsed mapping.

use crate::adapters::map::lookup;
use crate::domain::{Result, Setting, SettingsError, Value};
use crate::ports::{ConfigParser, Source};
use directories::ProjectDirs;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Maximum allowed size of a settings file (10MB)
/// This prevents denial of service attacks via extremely large files
const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

const SOURCE_NAME: &str = "file";

/// Settings source backed by a parsed file.
///
/// The file is parsed when the source is created. Nested settings are looked up in
/// nested mappings, like [`MapSource`](crate::adapters::MapSource).
///
/// # Examples
///
/// ```rust,no_run
/// use hexsettings::adapters::{FileSource, YamlParser};
///
/// // Load from a specific file
/// let source = FileSource::from_file("/path/to/settings.yaml", YamlParser::new()).unwrap();
///
/// // Load from the default OS location
/// let source = FileSource::from_default_location(
///     "myapp",
///     "com.example",
///     "settings.yaml",
///     YamlParser::new(),
/// )
/// .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct FileSource<P: ConfigParser> {
    /// Path of the file, `None` for in-memory content
    file_path: Option<PathBuf>,
    /// Parsed top-level mapping
    data: BTreeMap<String, Value>,
    parser: P,
}

impl<P: ConfigParser> FileSource<P> {
    /// Creates a source from a file path.
    ///
    /// The path is canonicalized and the file must not exceed 10MB.
    ///
    /// # Errors
    ///
    /// Returns a `SourceError` if the file cannot be accessed, is too large, or cannot
    /// be read, and a `ParseError` if its content is invalid.
    pub fn from_file(path: impl AsRef<Path>, parser: P) -> Result<Self> {
        let file_path = path.as_ref();

        // Canonicalize path to prevent directory traversal attacks
        let canonical_path = file_path
            .canonicalize()
            .map_err(|e| io_error("Invalid or inaccessible path", file_path, e))?;

        let data = read_file(&canonical_path, &parser)?;
        tracing::debug!(
            "Loaded {} top-level values from {}",
            data.len(),
            canonical_path.display()
        );

        Ok(Self {
            file_path: Some(canonical_path),
            data,
            parser,
        })
    }

    /// Creates a source from a file in the OS-appropriate configuration directory.
    ///
    /// This method uses the `directories` crate to determine the directory.
    ///
    /// # Arguments
    ///
    /// * `app_name` - The application name (e.g., "myapp")
    /// * `qualifier` - The organization/qualifier (e.g., "com.example")
    /// * `filename` - The settings file name (e.g., "settings.yaml")
    /// * `parser` - The parser for the file's format
    pub fn from_default_location(
        app_name: &str,
        qualifier: &str,
        filename: &str,
        parser: P,
    ) -> Result<Self> {
        let proj_dirs = ProjectDirs::from(qualifier, "", app_name).ok_or_else(|| {
            SettingsError::source_error(SOURCE_NAME, "Failed to determine project directories")
        })?;

        Self::from_file(proj_dirs.config_dir().join(filename), parser)
    }

    /// Creates a source from in-memory content.
    pub fn from_content(content: &str, parser: P) -> Result<Self> {
        let data = parse_mapping(&parser, content)?;
        Ok(Self {
            file_path: None,
            data,
            parser,
        })
    }

    /// Reads and parses the file again.
    ///
    /// Sources created from content are left unchanged.
    pub fn reload(&mut self) -> Result<()> {
        if let Some(path) = &self.file_path {
            self.data = read_file(path, &self.parser)?;
        }
        Ok(())
    }

    /// Returns the path to the settings file, if the source was loaded from one.
    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    /// Returns the parsed top-level mapping.
    pub fn data(&self) -> &BTreeMap<String, Value> {
        &self.data
    }
}

impl<P: ConfigParser> Source for FileSource<P> {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    fn read(&self, setting: &Setting, parents: &[String]) -> Result<Option<Value>> {
        Ok(lookup(&self.data, parents, setting.name()).cloned())
    }
}

fn read_file<P: ConfigParser>(path: &Path, parser: &P) -> Result<BTreeMap<String, Value>> {
    // Check file size before reading to prevent DoS via large files
    let metadata =
        fs::metadata(path).map_err(|e| io_error("Failed to read file metadata", path, e))?;

    if metadata.len() > MAX_FILE_SIZE {
        return Err(SettingsError::source_error(
            SOURCE_NAME,
            format!(
                "Settings file too large: {} bytes (max {} bytes)",
                metadata.len(),
                MAX_FILE_SIZE
            ),
        ));
    }

    let content =
        fs::read_to_string(path).map_err(|e| io_error("Failed to read settings file", path, e))?;
    parse_mapping(parser, &content)
}

/// Parses `content` into the top-level mapping.
///
/// A blank file or a document holding only a null parses as an empty mapping.
fn parse_mapping<P: ConfigParser>(parser: &P, content: &str) -> Result<BTreeMap<String, Value>> {
    if content.trim().is_empty() {
        return Ok(BTreeMap::new());
    }
    match parser.parse(content)? {
        Value::Map(map) => Ok(map),
        Value::None => Ok(BTreeMap::new()),
        other => Err(SettingsError::ParseError {
            message: format!(
                "Expected a mapping at the top level of the settings file, got `{}`",
                other.kind()
            ),
            source: None,
        }),
    }
}

fn io_error(what: &str, path: &Path, e: std::io::Error) -> SettingsError {
    SettingsError::SourceError {
        source_name: SOURCE_NAME.to_string(),
        message: format!(
            "{}: {}",
            what,
            path.file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("<unknown>")
        ),
        source: Some(Box::new(e)),
    }
}
