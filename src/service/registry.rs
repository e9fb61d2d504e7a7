// SPDX-License-Identifier: MIT OR Apache-2.0

//! Source registry.
//!
//! A [`SourceSpec`] says where values should come from: an in-memory mapping, a file
//! path, or a ready-made [`Source`]. The registry asks each registered
//! [`SourceFactory`] whether it can handle the specifier and lets the first one that
//! can build the source.

use crate::adapters::{FileSource, MapSource, ScriptParser};
use crate::domain::{Result, SettingsError, Value};
use crate::ports::{ConfigParser, Source};
use once_cell::sync::Lazy;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

/// A description of where setting values come from.
///
/// # Examples
///
/// ```rust
/// use hexsettings::adapters::MapSource;
/// use hexsettings::domain::Value;
/// use hexsettings::service::SourceSpec;
/// use std::collections::BTreeMap;
///
/// let from_path = SourceSpec::from("/etc/myapp/settings.yaml");
/// let from_map = SourceSpec::from(BTreeMap::<String, Value>::new());
/// let from_source = SourceSpec::source(MapSource::default());
/// ```
#[derive(Debug)]
pub enum SourceSpec {
    /// An in-memory mapping.
    Map(BTreeMap<String, Value>),
    /// A file path, dispatched on its extension.
    Path(PathBuf),
    /// A source that is used as is.
    Source(Box<dyn Source>),
}

impl SourceSpec {
    /// Wraps a ready-made source.
    pub fn source(source: impl Source + 'static) -> Self {
        SourceSpec::Source(Box::new(source))
    }

    /// Returns the file extension of a `Path` specifier.
    pub fn extension(&self) -> Option<&str> {
        match self {
            SourceSpec::Path(path) => path.extension().and_then(|e| e.to_str()),
            _ => None,
        }
    }
}

impl fmt::Display for SourceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceSpec::Map(map) => write!(f, "<mapping with {} keys>", map.len()),
            SourceSpec::Path(path) => write!(f, "{}", path.display()),
            SourceSpec::Source(source) => write!(f, "<source {}>", source.name()),
        }
    }
}

impl From<BTreeMap<String, Value>> for SourceSpec {
    fn from(map: BTreeMap<String, Value>) -> Self {
        SourceSpec::Map(map)
    }
}

impl From<PathBuf> for SourceSpec {
    fn from(path: PathBuf) -> Self {
        SourceSpec::Path(path)
    }
}

impl From<&Path> for SourceSpec {
    fn from(path: &Path) -> Self {
        SourceSpec::Path(path.to_path_buf())
    }
}

impl From<&str> for SourceSpec {
    fn from(path: &str) -> Self {
        SourceSpec::Path(PathBuf::from(path))
    }
}

impl From<String> for SourceSpec {
    fn from(path: String) -> Self {
        SourceSpec::Path(PathBuf::from(path))
    }
}

impl From<Box<dyn Source>> for SourceSpec {
    fn from(source: Box<dyn Source>) -> Self {
        SourceSpec::Source(source)
    }
}

impl From<MapSource> for SourceSpec {
    fn from(source: MapSource) -> Self {
        SourceSpec::source(source)
    }
}

/// Builds sources from the specifiers it recognises.
pub trait SourceFactory: Send + Sync {
    /// Returns a short name used in logs.
    fn name(&self) -> &str;

    /// Returns `true` if this factory can build a source for the specifier.
    fn can_handle(&self, spec: &SourceSpec) -> bool;

    /// Builds the source.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be created, e.g. the file is missing.
    fn create(&self, spec: SourceSpec) -> Result<Box<dyn Source>>;
}

impl fmt::Debug for dyn SourceFactory {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_tuple("SourceFactory")
            .field(&self.name())
            .finish()
    }
}

/// Builds [`MapSource`]s from mappings.
#[derive(Debug, Clone, Copy, Default)]
pub struct MapSourceFactory;

impl SourceFactory for MapSourceFactory {
    fn name(&self) -> &str {
        "map"
    }

    fn can_handle(&self, spec: &SourceSpec) -> bool {
        matches!(spec, SourceSpec::Map(_))
    }

    fn create(&self, spec: SourceSpec) -> Result<Box<dyn Source>> {
        match spec {
            SourceSpec::Map(map) => Ok(Box::new(MapSource::new(map))),
            other => Err(SettingsError::NoSuitableSource {
                spec: other.to_string(),
            }),
        }
    }
}

/// Builds [`FileSource`]s for paths whose extension the parser supports.
#[derive(Debug, Clone)]
pub struct FileSourceFactory<P> {
    name: String,
    parser: P,
}

impl<P: ConfigParser + Clone + 'static> FileSourceFactory<P> {
    /// Creates a factory for a parser.
    pub fn new(name: impl Into<String>, parser: P) -> Self {
        Self {
            name: name.into(),
            parser,
        }
    }
}

impl<P: ConfigParser + Clone + 'static> SourceFactory for FileSourceFactory<P> {
    fn name(&self) -> &str {
        &self.name
    }

    fn can_handle(&self, spec: &SourceSpec) -> bool {
        spec.extension()
            .is_some_and(|ext| self.parser.supports_extension(ext))
    }

    fn create(&self, spec: SourceSpec) -> Result<Box<dyn Source>> {
        match spec {
            SourceSpec::Path(path) => Ok(Box::new(FileSource::from_file(
                path,
                self.parser.clone(),
            )?)),
            other => Err(SettingsError::NoSuitableSource {
                spec: other.to_string(),
            }),
        }
    }
}

/// Recognises files of a format whose Cargo feature is disabled.
///
/// Creating the source always fails with an error naming the feature.
#[derive(Debug, Clone)]
pub struct UnavailableFormatFactory {
    name: String,
    extensions: Vec<String>,
    feature: String,
}

impl UnavailableFormatFactory {
    /// Creates a factory for the given extensions and Cargo feature.
    pub fn new<I, S>(name: impl Into<String>, extensions: I, feature: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            extensions: extensions.into_iter().map(Into::into).collect(),
            feature: feature.into(),
        }
    }
}

impl SourceFactory for UnavailableFormatFactory {
    fn name(&self) -> &str {
        &self.name
    }

    fn can_handle(&self, spec: &SourceSpec) -> bool {
        spec.extension().is_some_and(|ext| {
            self.extensions
                .iter()
                .any(|e| e.eq_ignore_ascii_case(ext))
        })
    }

    fn create(&self, spec: SourceSpec) -> Result<Box<dyn Source>> {
        Err(SettingsError::source_error(
            self.name.clone(),
            format!(
                "{} source is not available for `{}`: hexsettings was built without the `{}` feature",
                self.name, spec, self.feature
            ),
        ))
    }
}

/// An ordered set of source factories.
///
/// Factories registered later are consulted first, so a registered factory can take
/// over specifiers a built-in one would handle.
///
/// # Examples
///
/// ```rust
/// use hexsettings::domain::Value;
/// use hexsettings::service::SourceRegistry;
/// use std::collections::BTreeMap;
///
/// let registry = SourceRegistry::with_defaults();
/// let source = registry.get_source(BTreeMap::<String, Value>::new()).unwrap();
/// assert_eq!(source.name(), "map");
///
/// assert!(registry.get_source("settings.ini").is_err());
/// ```
#[derive(Debug, Default)]
pub struct SourceRegistry {
    factories: Vec<Box<dyn SourceFactory>>,
}

impl SourceRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the built-in factories enabled by the Cargo features.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(MapSourceFactory);
        registry.register(FileSourceFactory::new("python", ScriptParser::new()));

        #[cfg(feature = "json")]
        registry.register(FileSourceFactory::new(
            "json",
            crate::adapters::JsonParser::new(),
        ));
        #[cfg(not(feature = "json"))]
        registry.register(UnavailableFormatFactory::new("json", ["json", "js"], "json"));

        #[cfg(feature = "yaml")]
        registry.register(FileSourceFactory::new(
            "yaml",
            crate::adapters::YamlParser::new(),
        ));
        #[cfg(not(feature = "yaml"))]
        registry.register(UnavailableFormatFactory::new("yaml", ["yml", "yaml"], "yaml"));

        registry
    }

    /// Adds a factory. It is consulted before every factory registered earlier.
    pub fn register(&mut self, factory: impl SourceFactory + 'static) {
        tracing::debug!("Registering source factory {}", factory.name());
        self.factories.insert(0, Box::new(factory));
    }

    /// Returns the factory names in lookup order.
    pub fn factory_names(&self) -> Vec<&str> {
        self.factories.iter().map(|f| f.name()).collect()
    }

    /// Builds a source for a specifier.
    ///
    /// A [`SourceSpec::Source`] is returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::NoSuitableSource`] if no factory handles the
    /// specifier, or the error of the factory that does.
    pub fn get_source(&self, spec: impl Into<SourceSpec>) -> Result<Box<dyn Source>> {
        let spec = spec.into();
        if let SourceSpec::Source(source) = spec {
            return Ok(source);
        }

        match self.factories.iter().find(|f| f.can_handle(&spec)) {
            Some(factory) => {
                tracing::debug!("Creating {} source for {}", factory.name(), spec);
                factory.create(spec)
            }
            None => Err(SettingsError::NoSuitableSource {
                spec: spec.to_string(),
            }),
        }
    }
}

static REGISTRY: Lazy<RwLock<SourceRegistry>> =
    Lazy::new(|| RwLock::new(SourceRegistry::with_defaults()));

/// Adds a factory to the process-wide registry.
///
/// # Examples
///
/// ```rust
/// use hexsettings::adapters::ScriptParser;
/// use hexsettings::service::{register_source, FileSourceFactory};
///
/// register_source(FileSourceFactory::new("python", ScriptParser::new()));
/// ```
pub fn register_source(factory: impl SourceFactory + 'static) {
    REGISTRY
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .register(factory);
}

/// Builds a source for a specifier with the process-wide registry.
///
/// # Errors
///
/// See [`SourceRegistry::get_source`].
pub fn get_source(spec: impl Into<SourceSpec>) -> Result<Box<dyn Source>> {
    REGISTRY
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get_source(spec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Setting;
    use std::io::Write;
    use tempfile::Builder;

    fn bound(name: &str) -> Setting {
        let mut setting = Setting::undefined();
        setting.bind(name).unwrap();
        setting
    }

    fn temp_with_suffix(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_registry_map() {
        let registry = SourceRegistry::with_defaults();
        let mut map = BTreeMap::new();
        map.insert("PORT".to_string(), Value::from(1));

        let source = registry.get_source(map).unwrap();
        assert_eq!(source.name(), "map");
        assert_eq!(source.read(&bound("PORT"), &[]).unwrap(), Some(Value::Int(1)));
    }

    #[test]
    fn test_registry_passes_sources_through() {
        let registry = SourceRegistry::new();
        let source = registry
            .get_source(SourceSpec::source(MapSource::default()))
            .unwrap();
        assert_eq!(source.name(), "map");
    }

    #[test]
    fn test_registry_python_file() {
        let file = temp_with_suffix(".py", "PORT = 9090\n");
        let registry = SourceRegistry::with_defaults();
        let source = registry.get_source(file.path()).unwrap();
        assert_eq!(source.name(), "file");
        assert_eq!(source.read(&bound("PORT"), &[]).unwrap(), Some(Value::Int(9090)));
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_registry_json_file() {
        let file = temp_with_suffix(".JSON", r#"{"PORT": 9090}"#);
        let source = SourceRegistry::with_defaults().get_source(file.path()).unwrap();
        assert_eq!(source.read(&bound("PORT"), &[]).unwrap(), Some(Value::Int(9090)));
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn test_registry_yaml_file() {
        let file = temp_with_suffix(".yml", "PORT: 9090\n");
        let source = SourceRegistry::with_defaults().get_source(file.path()).unwrap();
        assert_eq!(source.read(&bound("PORT"), &[]).unwrap(), Some(Value::Int(9090)));
    }

    #[test]
    fn test_registry_missing_file_is_source_error() {
        let err = SourceRegistry::with_defaults()
            .get_source("/nonexistent/settings.py")
            .unwrap_err();
        assert!(matches!(err, SettingsError::SourceError { .. }));
    }

    #[test]
    fn test_registry_no_suitable_source() {
        let err = SourceRegistry::with_defaults()
            .get_source("settings.ini")
            .unwrap_err();
        match err {
            SettingsError::NoSuitableSource { spec } => assert_eq!(spec, "settings.ini"),
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(SourceRegistry::new()
            .get_source(BTreeMap::<String, Value>::new())
            .is_err());
    }

    #[test]
    fn test_unavailable_format_factory() {
        let mut registry = SourceRegistry::new();
        registry.register(UnavailableFormatFactory::new("toml", ["toml"], "toml"));

        let err = registry.get_source("settings.toml").unwrap_err();
        match err {
            SettingsError::SourceError { source_name, message, .. } => {
                assert_eq!(source_name, "toml");
                assert!(message.contains("`toml` feature"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_registered_factories_take_precedence() {
        let mut registry = SourceRegistry::with_defaults();
        registry.register(UnavailableFormatFactory::new("legacy", ["py"], "legacy"));

        assert_eq!(registry.factory_names()[0], "legacy");
        assert!(registry.get_source("settings.py").is_err());
    }

    #[derive(Debug, Clone)]
    struct ConfParser;

    impl ConfigParser for ConfParser {
        fn parse(&self, content: &str) -> Result<Value> {
            ScriptParser::new().parse(content)
        }

        fn supported_extensions(&self) -> &[&str] {
            &["conf"]
        }
    }

    #[test]
    fn test_global_registry() {
        assert!(get_source("settings.conf").is_err());

        register_source(FileSourceFactory::new("conf", ConfParser));
        let file = temp_with_suffix(".conf", "DEBUG = True\n");
        let source = get_source(file.path()).unwrap();
        assert_eq!(source.read(&bound("DEBUG"), &[]).unwrap(), Some(Value::Bool(true)));
    }
}
