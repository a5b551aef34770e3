//! The `validator` rule.

use kanon_core::Value;

use crate::{Check, Predicate, Rule};

/// Delegates to an opaque [`Predicate`].
///
/// Only a `Bool(true)` result passes. A validator without a predicate is
/// misconfigured.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    predicate: Option<Predicate>,
}

impl Validator {
    /// Validator calling `predicate`.
    #[must_use]
    pub const fn new(predicate: Predicate) -> Self {
        Self {
            predicate: Some(predicate),
        }
    }
}

impl Rule for Validator {
    fn name(&self) -> &str {
        "validator"
    }

    fn accepts_expectation(&self, _: &Value) -> bool {
        self.predicate.is_some()
    }

    fn supports(&self, _: &Value, _: &Value) -> bool {
        true
    }

    fn check(&self, check: &Check<'_>) -> bool {
        self.predicate.as_ref().is_some_and(|predicate| {
            predicate.call(check.config, check.key, check.value) == Value::Bool(true)
        })
    }
}
