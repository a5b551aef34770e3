//! The validation engine.

use std::collections::BTreeSet;
use std::thread;

use kanon_core::{Config, ConfigError};
use tracing::{debug, info, warn};

use crate::{find_unspecified, Constraint, Specification};

/// Evaluates a [`Specification`] against a merged [`Config`].
///
/// The error collection is ordered:
///
/// 1. Authoring errors of the specification
/// 2. Per constraint, in specification order: its misconfiguration, or its
///    violations (wildcard targets in config order)
/// 3. In strict mode, one `KeysWithoutSpecification` listing uncovered keys
///
/// With a parallelism above one, constraints are split into contiguous
/// chunks evaluated on scoped threads. Each worker fills its own buffer and
/// buffers are joined in chunk order, so the output is identical to a
/// sequential run.
///
/// # Example
///
/// ```
/// use kanon_core::Config;
/// use kanon_spec::{Specification, SpecificationBuilder, ValidationEngine};
///
/// let spec = Specification::from(
///     SpecificationBuilder::new("app.spec")
///         .constraint("name", "max_size", 5, 1)
///         .constraint("name", "matches", "^[a-z]+$", 2)
///         .build(),
/// );
/// let config: Config = [("name", "ABCDEF"), ("extra", "x")].into_iter().collect();
///
/// let errors = ValidationEngine::new().with_strict(true).validate(&config, &spec);
/// assert_eq!(errors.len(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationEngine {
    strict: bool,
    parallelism: usize,
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationEngine {
    /// Sequential, non-strict engine.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            strict: false,
            parallelism: 1,
        }
    }

    /// Report config keys no constraint targets.
    #[must_use]
    pub const fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Number of worker threads; 0 is treated as 1.
    #[must_use]
    pub fn with_parallelism(mut self, workers: usize) -> Self {
        self.parallelism = workers.max(1);
        self
    }

    /// Whether coverage is checked.
    #[must_use]
    pub const fn is_strict(&self) -> bool {
        self.strict
    }

    /// Configured number of workers.
    #[must_use]
    pub const fn parallelism(&self) -> usize {
        self.parallelism
    }

    /// Validate `config` against `spec`.
    pub fn validate(&self, config: &Config, spec: &Specification) -> Vec<ConfigError> {
        let mut errors = spec.errors().to_vec();
        errors.extend(self.evaluate(config, spec.constraints()));

        if self.strict {
            let unspecified: BTreeSet<String> = find_unspecified(config, spec);
            if !unspecified.is_empty() {
                warn!(keys = unspecified.len(), "keys without specification");
                errors.push(ConfigError::keys_without_specification(unspecified));
            }
        }

        info!(
            keys = config.len(),
            constraints = spec.len(),
            errors = errors.len(),
            "validation finished"
        );
        errors
    }

    fn evaluate(&self, config: &Config, constraints: &[Constraint]) -> Vec<ConfigError> {
        let workers = self.parallelism.min(constraints.len());
        if workers <= 1 {
            return evaluate_chunk(0, constraints, config);
        }

        let chunk_size = constraints.len().div_ceil(workers);
        thread::scope(|scope| {
            let handles: Vec<_> = constraints
                .chunks(chunk_size)
                .enumerate()
                .map(|(worker, chunk)| scope.spawn(move || evaluate_chunk(worker, chunk, config)))
                .collect();

            handles
                .into_iter()
                .flat_map(|handle| {
                    handle
                        .join()
                        .unwrap_or_else(|payload| std::panic::resume_unwind(payload))
                })
                .collect()
        })
    }
}

fn evaluate_chunk(worker: usize, constraints: &[Constraint], config: &Config) -> Vec<ConfigError> {
    let mut errors = Vec::new();
    for constraint in constraints {
        let before = errors.len();
        constraint.evaluate_into(config, &mut errors);
        if let Some(ConfigError::ConstraintMisconfigured { .. }) = errors.get(before) {
            warn!(
                key = %constraint.key(),
                rule = constraint.rule_name(),
                line = %constraint.source_line(),
                "constraint misconfigured"
            );
        }
    }
    debug!(
        worker,
        constraints = constraints.len(),
        errors = errors.len(),
        "constraint batch evaluated"
    );
    errors
}
