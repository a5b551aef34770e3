//! Specifications and their construction.
//!
//! Each specification source produces a [`SpecificationPartial`]: the
//! constraints it declares plus the authoring errors met while reading it.
//! [`Specification::aggregate`] concatenates partials in source order.

use std::sync::Arc;

use kanon_core::{ConfigError, SourceLine, Value};
use tracing::debug;

use crate::rules::{self, Validator};
use crate::{Constraint, KeyPattern, Predicate, Rule};

/// What one specification source contributes.
#[derive(Debug, Clone, Default)]
pub struct SpecificationPartial {
    /// Declared constraints, in declaration order.
    pub constraints: Vec<Constraint>,
    /// Authoring errors, in declaration order.
    pub errors: Vec<ConfigError>,
}

/// All constraints and authoring errors of a validation run.
#[derive(Debug, Clone, Default)]
pub struct Specification {
    constraints: Vec<Constraint>,
    errors: Vec<ConfigError>,
}

impl Specification {
    /// Concatenate partials in order.
    ///
    /// Constraints are not deduplicated: several constraints, even of the same
    /// rule, may target one key and all of them apply.
    pub fn aggregate(partials: impl IntoIterator<Item = SpecificationPartial>) -> Self {
        let mut spec = Self::default();
        for partial in partials {
            spec.constraints.extend(partial.constraints);
            spec.errors.extend(partial.errors);
        }
        debug!(
            constraints = spec.constraints.len(),
            errors = spec.errors.len(),
            "specification aggregated"
        );
        spec
    }

    /// All constraints, in source order.
    #[must_use]
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Authoring errors, in source order.
    #[must_use]
    pub fn errors(&self) -> &[ConfigError] {
        &self.errors
    }

    /// Returns `true` if any constraint targets `key`.
    #[must_use]
    pub fn covers(&self, key: &str) -> bool {
        self.constraints.iter().any(|c| c.targets(key))
    }

    /// Number of constraints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    /// Returns `true` if there are no constraints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }
}

impl FromIterator<SpecificationPartial> for Specification {
    fn from_iter<I: IntoIterator<Item = SpecificationPartial>>(iter: I) -> Self {
        Self::aggregate(iter)
    }
}

impl From<SpecificationPartial> for Specification {
    fn from(partial: SpecificationPartial) -> Self {
        Self::aggregate([partial])
    }
}

/// Programmatic specification source.
///
/// Declarations that cannot become constraints (unknown rule names, invalid
/// key patterns) are recorded as authoring errors; the remaining declarations
/// are unaffected.
///
/// # Example
///
/// ```
/// use kanon_core::Value;
/// use kanon_spec::{Predicate, SpecificationBuilder};
///
/// let partial = SpecificationBuilder::new("service.spec")
///     .constraint("server.port", "range", vec![1, 65535], 3)
///     .constraint("server.host", "blank", false, 4)
///     .constraint("db.*.url", "url", true, 5)
///     .validator(
///         "pool.max",
///         Predicate::from_bool(|config, _, value| {
///             value.compare(config.resolve("pool.min")).is_some_and(|o| o.is_ge())
///         }),
///         6,
///     )
///     .build();
///
/// assert_eq!(partial.constraints.len(), 4);
/// assert!(partial.errors.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct SpecificationBuilder {
    source: Arc<str>,
    partial: SpecificationPartial,
}

impl SpecificationBuilder {
    /// Start a partial for the source named `source`.
    pub fn new(source: impl Into<Arc<str>>) -> Self {
        Self {
            source: source.into(),
            partial: SpecificationPartial::default(),
        }
    }

    /// Declare a built-in rule on `key` at `line`.
    ///
    /// # Panics
    ///
    /// Panics if `line` is 0.
    #[must_use]
    pub fn constraint(
        self,
        key: &str,
        rule: &str,
        expectation: impl Into<Value>,
        line: u32,
    ) -> Self {
        let source_line = self.line(line);
        match rules::by_name(rule) {
            Some(rule) => self.bind(key, rule, expectation.into(), source_line),
            None => self.fail(ConfigError::unknown_constraint(rule, key, source_line)),
        }
    }

    /// Declare a `validator` rule on `key` delegating to `predicate`.
    ///
    /// # Panics
    ///
    /// Panics if `line` is 0.
    #[must_use]
    pub fn validator(self, key: &str, predicate: Predicate, line: u32) -> Self {
        let source_line = self.line(line);
        self.bind(key, Arc::new(Validator::new(predicate)), Value::Null, source_line)
    }

    /// Declare a custom rule on `key`.
    ///
    /// # Panics
    ///
    /// Panics if `line` is 0.
    #[must_use]
    pub fn rule(
        self,
        key: &str,
        rule: Arc<dyn Rule>,
        expectation: impl Into<Value>,
        line: u32,
    ) -> Self {
        let source_line = self.line(line);
        self.bind(key, rule, expectation.into(), source_line)
    }

    /// Finish the partial.
    #[must_use]
    pub fn build(self) -> SpecificationPartial {
        self.partial
    }

    fn line(&self, line: u32) -> SourceLine {
        SourceLine::new(Arc::clone(&self.source), line)
    }

    fn bind(
        mut self,
        key: &str,
        rule: Arc<dyn Rule>,
        expectation: Value,
        source_line: SourceLine,
    ) -> Self {
        match KeyPattern::parse(key) {
            Ok(pattern) => {
                self.partial
                    .constraints
                    .push(Constraint::new(pattern, rule, expectation, source_line));
                self
            }
            Err(reason) => self.fail(ConfigError::invalid_key_pattern(
                key,
                reason.to_string(),
                source_line,
            )),
        }
    }

    fn fail(mut self, error: ConfigError) -> Self {
        self.partial.errors.push(error);
        self
    }
}
