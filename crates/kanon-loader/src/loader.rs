//! Ordered loading of config sources.
//!
//! The [`Loader`] applies sources in declaration order, later sources
//! overriding earlier ones key by key:
//!
//! 1. The base config (empty unless set)
//! 2. Each source, converted by the factory the registry picks for it
//!
//! Failures never abort the load. Each failing source contributes one error
//! to the [`LoadOutcome`] and the remaining sources are still applied.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use kanon_core::{Config, ConfigError};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::{ConfigFactory, FactoryRegistry};

/// A source file and the profile to read it with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    path: PathBuf,
    profile: Option<String>,
}

impl Source {
    /// Source read without a profile.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            profile: None,
        }
    }

    /// Select the profile this source is read with.
    #[must_use]
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    /// Path of the source file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Selected profile, if any.
    #[must_use]
    pub fn profile(&self) -> Option<&str> {
        self.profile.as_deref()
    }
}

/// Result of a load: the merged config and every error met on the way.
#[derive(Debug, Clone, Default)]
pub struct LoadOutcome {
    /// Merged configuration.
    pub config: Config,
    /// Load errors in source order.
    pub errors: Vec<ConfigError>,
}

impl LoadOutcome {
    /// Returns `true` if every source loaded.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Loads an ordered list of sources into one [`Config`].
///
/// # Example
///
/// ```no_run
/// use kanon_loader::{FactoryRegistry, Loader};
///
/// let outcome = Loader::new(FactoryRegistry::with_defaults())
///     .source("defaults.toml")
///     .source_with_profile("app.properties", "prod")
///     .load();
///
/// for error in &outcome.errors {
///     eprintln!("{error}");
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Loader {
    registry: FactoryRegistry,
    base: Config,
    sources: Vec<Source>,
}

impl Loader {
    /// Create a loader using `registry` to pick factories.
    #[must_use]
    pub fn new(registry: FactoryRegistry) -> Self {
        Self {
            registry,
            base: Config::new(),
            sources: Vec::new(),
        }
    }

    /// Start from `base` instead of an empty config.
    #[must_use]
    pub fn with_base(mut self, base: Config) -> Self {
        self.base = base;
        self
    }

    /// Append a source read without a profile.
    #[must_use]
    pub fn source(mut self, path: impl Into<PathBuf>) -> Self {
        self.add_source(Source::new(path));
        self
    }

    /// Append a source read with `profile`.
    #[must_use]
    pub fn source_with_profile(mut self, path: impl Into<PathBuf>, profile: impl Into<String>) -> Self {
        self.add_source(Source::new(path).with_profile(profile));
        self
    }

    /// Append a source.
    pub fn add_source(&mut self, source: Source) {
        self.sources.push(source);
    }

    /// Declared sources, in order.
    #[must_use]
    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    /// The factory registry.
    #[must_use]
    pub const fn registry(&self) -> &FactoryRegistry {
        &self.registry
    }

    /// Load every source in order.
    ///
    /// Each factory sees the config accumulated so far as its interpolation
    /// context, so later sources may reference keys of earlier ones.
    pub fn load(&self) -> LoadOutcome {
        let mut config = self.base.clone();
        let mut errors = Vec::new();

        for source in &self.sources {
            match self.load_source(source, &config) {
                Ok(fragment) => config.merge_from(fragment),
                Err(err) => {
                    warn!(file = %source.path.display(), error = %err, "source failed to load");
                    errors.push(err);
                }
            }
        }

        info!(
            sources = self.sources.len(),
            keys = config.len(),
            failures = errors.len(),
            "configuration loaded"
        );
        LoadOutcome { config, errors }
    }

    /// Load every source in parallel on the blocking pool.
    ///
    /// Sources are converted concurrently against the base config as their
    /// only interpolation context, then merged in declaration order. For
    /// sources that do not reference each other the outcome equals
    /// [`load`](Self::load).
    pub async fn load_concurrent(&self) -> LoadOutcome {
        let context = Arc::new(self.base.clone());

        let pending: Vec<Result<Pending, ConfigError>> = self
            .sources
            .iter()
            .map(|source| {
                let factory = self.registry.resolve(&source.path)?;
                Ok(Pending::spawn(factory, source.clone(), Arc::clone(&context)))
            })
            .collect();

        let mut config = self.base.clone();
        let mut errors = Vec::new();
        for (source, task) in self.sources.iter().zip(pending) {
            let result = match task {
                Ok(task) => task.join().await,
                Err(err) => Err(err),
            };
            match result {
                Ok(fragment) => config.merge_from(fragment),
                Err(err) => {
                    warn!(file = %source.path.display(), error = %err, "source failed to load");
                    errors.push(err);
                }
            }
        }

        info!(
            sources = self.sources.len(),
            keys = config.len(),
            failures = errors.len(),
            "configuration loaded concurrently"
        );
        LoadOutcome { config, errors }
    }

    fn load_source(&self, source: &Source, context: &Config) -> Result<Config, ConfigError> {
        let factory = self.registry.resolve(&source.path)?;
        convert(factory.as_ref(), source, context)
    }
}

struct Pending {
    path: PathBuf,
    factory: String,
    handle: JoinHandle<Result<Config, ConfigError>>,
}

impl Pending {
    fn spawn(factory: Arc<dyn ConfigFactory>, source: Source, context: Arc<Config>) -> Self {
        Self {
            path: source.path.clone(),
            factory: factory.name().to_string(),
            handle: tokio::task::spawn_blocking(move || {
                convert(factory.as_ref(), &source, &context)
            }),
        }
    }

    async fn join(self) -> Result<Config, ConfigError> {
        match self.handle.await {
            Ok(result) => result,
            Err(join_error) => Err(ConfigError::failed_to_load(
                self.path,
                self.factory,
                join_error,
            )),
        }
    }
}

fn convert(
    factory: &dyn ConfigFactory,
    source: &Source,
    context: &Config,
) -> Result<Config, ConfigError> {
    let fragment = factory
        .create(&source.path, source.profile(), context)
        .map_err(|e| ConfigError::failed_to_load(&source.path, factory.name(), e))?;

    debug!(
        file = %source.path.display(),
        factory = factory.name(),
        profile = source.profile().unwrap_or_default(),
        keys = fragment.len(),
        "source loaded"
    );
    Ok(fragment)
}
