//! Config factories and their registry.
//!
//! A [`ConfigFactory`] turns one source file into a config fragment. The
//! [`FactoryRegistry`] picks the factory for a file; it does not arbitrate
//! when several factories claim the same file, the first registered one wins.

use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use kanon_core::{Config, ConfigError};

use crate::{JsonFactory, LoadError, PropertiesFactory, TomlFactory};

/// Converts a source file into a config fragment.
///
/// # Example
///
/// ```
/// use std::path::Path;
/// use kanon_core::Config;
/// use kanon_loader::{ConfigFactory, LoadError};
///
/// #[derive(Debug)]
/// struct Fixed;
///
/// impl ConfigFactory for Fixed {
///     fn name(&self) -> &str {
///         "fixed"
///     }
///
///     fn supports(&self, path: &Path) -> bool {
///         path.ends_with("fixed.cfg")
///     }
///
///     fn create(&self, _: &Path, _: Option<&str>, _: &Config) -> Result<Config, LoadError> {
///         Ok([("app.name", "fixed")].into_iter().collect())
///     }
/// }
/// ```
pub trait ConfigFactory: Send + Sync + fmt::Debug {
    /// Identity of the factory, reported in load errors.
    fn name(&self) -> &str;

    /// Whether this factory can convert `path`.
    fn supports(&self, path: &Path) -> bool;

    /// Convert `path` into a config fragment.
    ///
    /// `profile` selects a variant view of a multi-profile source. `context`
    /// is the configuration accumulated from earlier sources, available for
    /// interpolation.
    fn create(
        &self,
        path: &Path,
        profile: Option<&str>,
        context: &Config,
    ) -> Result<Config, LoadError>;
}

/// Ordered set of factories.
#[derive(Debug, Clone, Default)]
pub struct FactoryRegistry {
    factories: Vec<Arc<dyn ConfigFactory>>,
}

impl FactoryRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in properties, TOML and JSON factories.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new()
            .with(PropertiesFactory)
            .with(TomlFactory)
            .with(JsonFactory)
    }

    /// Register a factory, builder style.
    #[must_use]
    pub fn with(mut self, factory: impl ConfigFactory + 'static) -> Self {
        self.register(factory);
        self
    }

    /// Register a factory.
    pub fn register(&mut self, factory: impl ConfigFactory + 'static) {
        self.factories.push(Arc::new(factory));
    }

    /// Find the factory supporting `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoSuitableFactory`] when no factory supports it.
    pub fn resolve(&self, path: &Path) -> Result<Arc<dyn ConfigFactory>, ConfigError> {
        self.factories
            .iter()
            .find(|factory| factory.supports(path))
            .cloned()
            .ok_or_else(|| ConfigError::no_suitable_factory(path))
    }

    /// Names of the registered factories, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.iter().map(|factory| factory.name())
    }

    /// Number of registered factories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Returns `true` if no factory is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

/// Case-insensitive file extension check.
pub(crate) fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(extension))
}

pub(crate) fn read_source(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|e| LoadError::read(path, e))
}
