//! Equality-based rules.

use kanon_core::Value;

use crate::{Check, Rule};

/// `in_list: [..]` requires the value to equal one of the elements.
///
/// Numbers compare by mathematical value, so `8080` is in `[8080.0]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct InList;

impl Rule for InList {
    fn name(&self) -> &str {
        "in_list"
    }

    fn accepts_expectation(&self, expectation: &Value) -> bool {
        expectation.as_list().is_some_and(|items| !items.is_empty())
    }

    fn supports(&self, _: &Value, _: &Value) -> bool {
        true
    }

    fn check(&self, check: &Check<'_>) -> bool {
        check
            .expectation
            .as_list()
            .is_some_and(|items| items.iter().any(|item| item.same_value(check.value)))
    }
}

/// `not_equal: v` rejects values equal to `v`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotEqual;

impl Rule for NotEqual {
    fn name(&self) -> &str {
        "not_equal"
    }

    fn accepts_expectation(&self, expectation: &Value) -> bool {
        !expectation.is_null()
    }

    fn supports(&self, _: &Value, _: &Value) -> bool {
        true
    }

    fn check(&self, check: &Check<'_>) -> bool {
        !check.value.same_value(check.expectation)
    }
}

/// `nullable: false` rejects `Null`, including absent keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct Nullable;

impl Rule for Nullable {
    fn name(&self) -> &str {
        "nullable"
    }

    fn accepts_expectation(&self, expectation: &Value) -> bool {
        expectation.as_bool().is_some()
    }

    fn supports(&self, _: &Value, _: &Value) -> bool {
        true
    }

    fn skips_null(&self) -> bool {
        false
    }

    fn check(&self, check: &Check<'_>) -> bool {
        check.expectation.as_bool() == Some(true) || !check.value.is_null()
    }
}
