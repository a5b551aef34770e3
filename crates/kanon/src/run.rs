//! End-to-end validation runs.
//!
//! A [`ValidationRun`] loads its sources into one [`Config`], validates the
//! result against the aggregated specification and returns a [`Report`]
//! holding both. Load errors come first in the report, followed by the
//! engine's output (authoring errors, constraint errors, coverage).

use std::path::PathBuf;

use kanon_core::{Config, ConfigError, ErrorKind};
use kanon_loader::{FactoryRegistry, LoadOutcome, Loader, Source};
use kanon_spec::{Specification, SpecificationPartial, ValidationEngine};
use tracing::{info, warn};

use crate::KanonSettings;

/// Outcome of a [`ValidationRun`].
#[derive(Debug, Clone, Default)]
pub struct Report {
    /// Merged configuration.
    pub config: Config,
    /// Every error, load errors first.
    pub errors: Vec<ConfigError>,
}

impl Report {
    /// Returns `true` if nothing went wrong.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Errors of one kind, in report order.
    pub fn errors_of(&self, kind: ErrorKind) -> impl Iterator<Item = &ConfigError> + '_ {
        self.errors.iter().filter(move |e| e.kind() == kind)
    }

    /// Log one summary line, then one line per error.
    pub fn log_summary(&self) {
        let count = |kind| self.errors_of(kind).count();
        info!(
            keys = self.config.len(),
            errors = self.errors.len(),
            load = count(ErrorKind::Load),
            authoring = count(ErrorKind::Authoring),
            misconfigured = count(ErrorKind::Misconfiguration),
            violations = count(ErrorKind::Violation),
            coverage = count(ErrorKind::Coverage),
            "run finished"
        );

        for error in &self.errors {
            warn!(code = %error.code(), key = error.key().unwrap_or_default(), "{error}");
        }
    }
}

/// Loads sources and validates them in one step.
///
/// # Example
///
/// ```no_run
/// use kanon::{FactoryRegistry, SpecificationBuilder, ValidationRun};
///
/// let report = ValidationRun::new(FactoryRegistry::with_defaults())
///     .source("defaults.toml")
///     .source_with_profile("app.properties", "prod")
///     .specification(
///         SpecificationBuilder::new("app.spec")
///             .constraint("server.port", "range", vec![1, 65535], 1)
///             .build(),
///     )
///     .strict(true)
///     .execute();
///
/// report.log_summary();
/// ```
#[derive(Debug, Clone)]
pub struct ValidationRun {
    loader: Loader,
    partials: Vec<SpecificationPartial>,
    engine: ValidationEngine,
    profile: Option<String>,
}

impl ValidationRun {
    /// Create a run using `registry` to pick factories.
    #[must_use]
    pub fn new(registry: FactoryRegistry) -> Self {
        Self {
            loader: Loader::new(registry),
            partials: Vec::new(),
            engine: ValidationEngine::new(),
            profile: None,
        }
    }

    /// Create a run with strictness, parallelism and default profile taken
    /// from `settings`.
    #[must_use]
    pub fn from_settings(settings: &KanonSettings, registry: FactoryRegistry) -> Self {
        let validation = &settings.validation;
        Self {
            profile: validation.profile.clone(),
            ..Self::new(registry)
        }
        .strict(validation.strict)
        .parallelism(validation.parallelism)
    }

    /// Append a source, read with the default profile if one is set.
    #[must_use]
    pub fn source(mut self, path: impl Into<PathBuf>) -> Self {
        let source = match &self.profile {
            Some(profile) => Source::new(path).with_profile(profile.clone()),
            None => Source::new(path),
        };
        self.loader.add_source(source);
        self
    }

    /// Append a source read with `profile`.
    #[must_use]
    pub fn source_with_profile(mut self, path: impl Into<PathBuf>, profile: impl Into<String>) -> Self {
        self.loader.add_source(Source::new(path).with_profile(profile));
        self
    }

    /// Start loading from `base` instead of an empty config.
    #[must_use]
    pub fn base(mut self, base: Config) -> Self {
        self.loader = self.loader.with_base(base);
        self
    }

    /// Add one specification source.
    #[must_use]
    pub fn specification(mut self, partial: SpecificationPartial) -> Self {
        self.partials.push(partial);
        self
    }

    /// Report keys no constraint covers.
    #[must_use]
    pub fn strict(mut self, strict: bool) -> Self {
        self.engine = self.engine.with_strict(strict);
        self
    }

    /// Worker threads for constraint evaluation. Zero is treated as one.
    #[must_use]
    pub fn parallelism(mut self, workers: usize) -> Self {
        self.engine = self.engine.with_parallelism(workers);
        self
    }

    /// Load every source in order, then validate.
    #[must_use]
    pub fn execute(&self) -> Report {
        self.finish(self.loader.load())
    }

    /// Like [`execute`](Self::execute), converting sources concurrently.
    ///
    /// Placeholders in a source resolve against the base config only, not
    /// against earlier sources.
    pub async fn execute_concurrent(&self) -> Report {
        self.finish(self.loader.load_concurrent().await)
    }

    fn finish(&self, outcome: LoadOutcome) -> Report {
        let LoadOutcome { config, mut errors } = outcome;
        let spec = Specification::aggregate(self.partials.iter().cloned());
        errors.extend(self.engine.validate(&config, &spec));
        Report { config, errors }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kanon_spec::SpecificationBuilder;

    fn with_base(pairs: &[(&str, i64)]) -> ValidationRun {
        let base: Config = pairs.iter().map(|&(k, v)| (k, v)).collect();
        ValidationRun::new(FactoryRegistry::new()).base(base)
    }

    #[test]
    fn test_empty_run_is_valid() {
        let report = ValidationRun::new(FactoryRegistry::new()).execute();
        assert!(report.is_valid());
        assert!(report.config.is_empty());
    }

    #[test]
    fn test_load_errors_come_first() {
        let report = with_base(&[("port", 0)])
            .source("settings.ini")
            .specification(
                SpecificationBuilder::new("s")
                    .constraint("port", "min", 1, 1)
                    .build(),
            )
            .execute();

        let kinds: Vec<_> = report.errors.iter().map(ConfigError::kind).collect();
        assert_eq!(kinds, [ErrorKind::Load, ErrorKind::Violation]);
        assert_eq!(report.errors_of(ErrorKind::Violation).count(), 1);
        assert_eq!(report.errors_of(ErrorKind::Coverage).count(), 0);
    }

    #[test]
    fn test_from_settings() {
        let mut settings = KanonSettings::default();
        settings.validation.strict = true;
        settings.validation.parallelism = 4;
        settings.validation.profile = Some("prod".to_string());

        let run = ValidationRun::from_settings(&settings, FactoryRegistry::new()).source("a.toml");
        assert!(run.engine.is_strict());
        assert_eq!(run.engine.parallelism(), 4);
        assert_eq!(run.loader.sources()[0].profile(), Some("prod"));

        let run = run.source_with_profile("b.toml", "dev");
        assert_eq!(run.loader.sources()[1].profile(), Some("dev"));
    }

    #[test]
    fn test_specifications_aggregate() {
        let report = with_base(&[("a", 1), ("b", 2), ("c", 3)])
            .specification(SpecificationBuilder::new("one").constraint("a", "max", 0, 1).build())
            .specification(SpecificationBuilder::new("two").constraint("b", "max", 0, 1).build())
            .strict(true)
            .execute();

        let keys: Vec<_> = report
            .errors_of(ErrorKind::Violation)
            .filter_map(ConfigError::key)
            .collect();
        assert_eq!(keys, ["a", "b"]);
        assert_eq!(report.errors.last().map(ConfigError::kind), Some(ErrorKind::Coverage));
    }
}
