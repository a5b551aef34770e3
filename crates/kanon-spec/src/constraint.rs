//! Constraints and the [`Rule`] trait behind them.
//!
//! A [`Constraint`] binds a [`Rule`] to a key pattern, an expectation and the
//! line it was declared on. Evaluating it against a config follows a fixed
//! sequence:
//!
//! 1. The rule checks its expectation; a malformed one yields a single
//!    misconfiguration and nothing else.
//! 2. The pattern's target keys are resolved (absent literal keys are `Null`).
//! 3. `Null` and blank text are skipped unless the rule opts out.
//! 4. Values of kinds the rule does not support are skipped.
//! 5. The rule judges the value; a failure is a violation.

use std::fmt;
use std::sync::Arc;

use kanon_core::{Config, ConfigError, SourceLine, Value};

use crate::KeyPattern;

/// Everything a rule sees when judging one value.
#[derive(Debug, Clone, Copy)]
pub struct Check<'a> {
    /// The merged configuration.
    pub config: &'a Config,
    /// The key being checked.
    pub key: &'a str,
    /// The value at that key (`Null` when absent).
    pub value: &'a Value,
    /// The constraint's expectation.
    pub expectation: &'a Value,
}

/// A validation rule variant.
///
/// Rules are stateless judges: the expectation they are parameterised by is
/// owned by the [`Constraint`] and passed in on every call.
pub trait Rule: Send + Sync + fmt::Debug {
    /// Rule name, used in message codes.
    fn name(&self) -> &str;

    /// Whether `expectation` is well-formed for this rule.
    fn accepts_expectation(&self, expectation: &Value) -> bool;

    /// Whether this rule applies to `value` at all.
    ///
    /// Unsupported values are skipped, not violated.
    fn supports(&self, expectation: &Value, value: &Value) -> bool;

    /// Whether `Null` values are skipped before [`check`](Self::check).
    fn skips_null(&self) -> bool {
        true
    }

    /// Whether blank text is skipped before [`check`](Self::check).
    fn skips_blank(&self) -> bool {
        true
    }

    /// Returns `true` if the value satisfies the rule.
    fn check(&self, check: &Check<'_>) -> bool;
}

/// Opaque predicate behind the `validator` rule.
///
/// Called with the full config, the key and its value. Only `Bool(true)`
/// passes; any other result is a violation.
#[derive(Clone)]
pub struct Predicate(Arc<dyn Fn(&Config, &str, &Value) -> Value + Send + Sync>);

impl Predicate {
    /// Wrap a predicate returning a [`Value`].
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&Config, &str, &Value) -> Value + Send + Sync + 'static,
    {
        Self(Arc::new(predicate))
    }

    /// Wrap a predicate returning a plain `bool`.
    pub fn from_bool<F>(predicate: F) -> Self
    where
        F: Fn(&Config, &str, &Value) -> bool + Send + Sync + 'static,
    {
        Self::new(move |config, key, value| Value::Bool(predicate(config, key, value)))
    }

    /// Invoke the predicate.
    pub fn call(&self, config: &Config, key: &str, value: &Value) -> Value {
        (self.0)(config, key, value)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate(..)")
    }
}

/// A rule bound to a key pattern, an expectation and a declaration line.
#[derive(Debug, Clone)]
pub struct Constraint {
    key: KeyPattern,
    expectation: Value,
    source_line: SourceLine,
    rule: Arc<dyn Rule>,
}

impl Constraint {
    /// Create a constraint.
    pub fn new(
        key: KeyPattern,
        rule: Arc<dyn Rule>,
        expectation: impl Into<Value>,
        source_line: SourceLine,
    ) -> Self {
        Self {
            key,
            expectation: expectation.into(),
            source_line,
            rule,
        }
    }

    /// The key pattern this constraint is bound to.
    #[must_use]
    pub const fn key(&self) -> &KeyPattern {
        &self.key
    }

    /// The expectation payload.
    #[must_use]
    pub const fn expectation(&self) -> &Value {
        &self.expectation
    }

    /// Where this constraint was declared.
    #[must_use]
    pub const fn source_line(&self) -> &SourceLine {
        &self.source_line
    }

    /// The rule's name.
    #[must_use]
    pub fn rule_name(&self) -> &str {
        self.rule.name()
    }

    /// Returns `true` if the constraint's pattern matches `key`.
    #[must_use]
    pub fn targets(&self, key: &str) -> bool {
        self.key.matches(key)
    }

    /// The misconfiguration error, if the expectation is malformed.
    #[must_use]
    pub fn misconfiguration(&self) -> Option<ConfigError> {
        (!self.rule.accepts_expectation(&self.expectation)).then(|| {
            ConfigError::constraint_misconfigured(
                self.rule.name(),
                self.expectation.clone(),
                self.source_line.clone(),
            )
        })
    }

    /// Evaluate against `config`, appending errors to `errors`.
    pub fn evaluate_into(&self, config: &Config, errors: &mut Vec<ConfigError>) {
        if let Some(misconfigured) = self.misconfiguration() {
            errors.push(misconfigured);
            return;
        }
        errors.extend(
            self.key
                .targets(config)
                .into_iter()
                .filter_map(|(key, value)| self.check_value(config, key, value)),
        );
    }

    /// Evaluate against `config`.
    #[must_use]
    pub fn evaluate(&self, config: &Config) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        self.evaluate_into(config, &mut errors);
        errors
    }

    /// Judge a single value, assuming a well-formed expectation.
    ///
    /// Returns the violation, or `None` if the value passes or is skipped.
    #[must_use]
    pub fn check_value(&self, config: &Config, key: &str, value: &Value) -> Option<ConfigError> {
        if value.is_null() && self.rule.skips_null() {
            return None;
        }
        if value.is_blank() && self.rule.skips_blank() {
            return None;
        }
        if !self.rule.supports(&self.expectation, value) {
            return None;
        }

        let check = Check {
            config,
            key,
            value,
            expectation: &self.expectation,
        };
        (!self.rule.check(&check)).then(|| {
            ConfigError::constraint_violated(
                key,
                value.clone(),
                self.rule.name(),
                self.expectation.clone(),
                self.source_line.clone(),
            )
        })
    }
}
