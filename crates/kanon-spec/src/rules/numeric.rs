//! Bound and scale rules.
//!
//! Bounds compare by meaning: numbers by mathematical value whatever their
//! representation (`Integer(10)`, `Float(10.0)` and `Decimal(10.00)` are
//! equal), text lexicographically. A bound only applies to values of its own
//! family; text is never compared against a numeric bound.

use std::cmp::Ordering;

use kanon_core::Value;

use crate::{Check, Rule};

fn is_bound(value: &Value) -> bool {
    matches!(value, Value::String(_)) || value.to_decimal().is_some()
}

fn same_family(a: &Value, b: &Value) -> bool {
    (a.is_numeric() && b.is_numeric())
        || (matches!(a, Value::String(_)) && matches!(b, Value::String(_)))
}

fn range(expectation: &Value) -> Option<(&Value, &Value)> {
    match expectation.as_list()? {
        [lo, hi] if is_bound(lo) && is_bound(hi) && same_family(lo, hi) => {
            matches!(lo.compare(hi), Some(Ordering::Less | Ordering::Equal)).then_some((lo, hi))
        }
        _ => None,
    }
}

/// `min: bound` requires `value >= bound`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Min;

impl Rule for Min {
    fn name(&self) -> &str {
        "min"
    }

    fn accepts_expectation(&self, expectation: &Value) -> bool {
        is_bound(expectation)
    }

    fn supports(&self, expectation: &Value, value: &Value) -> bool {
        same_family(expectation, value)
    }

    fn check(&self, check: &Check<'_>) -> bool {
        matches!(
            check.value.compare(check.expectation),
            Some(Ordering::Greater | Ordering::Equal)
        )
    }
}

/// `max: bound` requires `value <= bound`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Max;

impl Rule for Max {
    fn name(&self) -> &str {
        "max"
    }

    fn accepts_expectation(&self, expectation: &Value) -> bool {
        is_bound(expectation)
    }

    fn supports(&self, expectation: &Value, value: &Value) -> bool {
        same_family(expectation, value)
    }

    fn check(&self, check: &Check<'_>) -> bool {
        matches!(
            check.value.compare(check.expectation),
            Some(Ordering::Less | Ordering::Equal)
        )
    }
}

/// `range: [lo, hi]` requires `lo <= value <= hi`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Range;

impl Rule for Range {
    fn name(&self) -> &str {
        "range"
    }

    fn accepts_expectation(&self, expectation: &Value) -> bool {
        range(expectation).is_some()
    }

    fn supports(&self, expectation: &Value, value: &Value) -> bool {
        range(expectation).is_some_and(|(lo, _)| same_family(lo, value))
    }

    fn check(&self, check: &Check<'_>) -> bool {
        range(check.expectation).is_some_and(|(lo, hi)| {
            matches!(
                check.value.compare(lo),
                Some(Ordering::Greater | Ordering::Equal)
            ) && matches!(
                check.value.compare(hi),
                Some(Ordering::Less | Ordering::Equal)
            )
        })
    }
}

/// `scale: n` allows at most `n` significant fractional digits.
///
/// Trailing zeros do not count, so `1.50` has scale 1. Integers always pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct Scale;

impl Scale {
    /// Significant fractional digits of a numeric value.
    #[must_use]
    pub fn of(value: &Value) -> Option<u64> {
        if let Value::Integer(_) = value {
            return Some(0);
        }
        let (_, exponent) = value.to_decimal()?.normalized().as_bigint_and_exponent();
        Some(u64::try_from(exponent).unwrap_or(0))
    }
}

impl Rule for Scale {
    fn name(&self) -> &str {
        "scale"
    }

    fn accepts_expectation(&self, expectation: &Value) -> bool {
        expectation.as_i64().is_some_and(|n| n >= 0)
    }

    fn supports(&self, _: &Value, value: &Value) -> bool {
        value.is_numeric()
    }

    fn check(&self, check: &Check<'_>) -> bool {
        let bound = check
            .expectation
            .as_i64()
            .and_then(|n| u64::try_from(n).ok());
        matches!((Self::of(check.value), bound), (Some(scale), Some(max)) if scale <= max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kanon_core::{BigDecimal, Config};
    use std::str::FromStr;

    fn passes(rule: &dyn Rule, expectation: impl Into<Value>, value: impl Into<Value>) -> bool {
        let config = Config::new();
        let expectation = expectation.into();
        let value = value.into();
        rule.check(&Check {
            config: &config,
            key: "k",
            value: &value,
            expectation: &expectation,
        })
    }

    fn decimal(s: &str) -> Value {
        Value::Decimal(BigDecimal::from_str(s).unwrap())
    }

    #[test]
    fn test_min_max_across_representations() {
        assert!(passes(&Min, 10, 10.0));
        assert!(passes(&Min, decimal("9.99"), 10));
        assert!(!passes(&Min, 10, decimal("9.999")));
        assert!(passes(&Max, 0.5, decimal("0.50")));
        assert!(!passes(&Max, 1, 1.000_001));
    }

    #[test]
    fn test_text_bounds() {
        assert!(passes(&Min, "b", "c"));
        assert!(!passes(&Max, "b", "c"));
        assert!(!Min.supports(&Value::Integer(1), &Value::from("5")));
        assert!(!Max.supports(&Value::from("5"), &Value::Integer(1)));
    }

    #[test]
    fn test_range() {
        let bounds = Value::from(vec![1, 10]);
        assert!(passes(&Range, bounds.clone(), 1));
        assert!(passes(&Range, bounds.clone(), 10.0));
        assert!(!passes(&Range, bounds.clone(), decimal("10.01")));
        assert!(!passes(&Range, bounds, 0));
    }

    #[test]
    fn test_infinite_values_against_bounds() {
        assert!(passes(&Min, 10, f64::INFINITY));
        assert!(!passes(&Min, 10, f64::NEG_INFINITY));
        assert!(passes(&Max, decimal("1e30"), f64::NEG_INFINITY));
        assert!(!passes(&Max, 10, f64::INFINITY));

        let bounds = Value::from(vec![1, 10]);
        assert!(!passes(&Range, bounds.clone(), f64::INFINITY));
        assert!(!passes(&Range, bounds, f64::NEG_INFINITY));
        assert!(!passes(&Min, 10, f64::NAN));
    }

    #[test]
    fn test_range_expectation_shape() {
        assert!(Range.accepts_expectation(&Value::from(vec![1.5, 2.0])));
        assert!(Range.accepts_expectation(&Value::from(vec!["a", "z"])));
        assert!(!Range.accepts_expectation(&Value::from(vec![5, 1])));
        assert!(!Range.accepts_expectation(&Value::List(vec![
            Value::Integer(1),
            Value::from("z")
        ])));
        assert!(!Range.accepts_expectation(&Value::from(vec![1])));
        assert!(!Min.accepts_expectation(&Value::Bool(true)));
        assert!(!Min.accepts_expectation(&Value::Float(f64::NAN)));
    }

    #[test]
    fn test_scale() {
        assert_eq!(Scale::of(&decimal("1.50")), Some(1));
        assert_eq!(Scale::of(&decimal("100")), Some(0));
        assert_eq!(Scale::of(&Value::Float(0.125)), Some(3));
        assert_eq!(Scale::of(&Value::Integer(42)), Some(0));

        assert!(passes(&Scale, 2, decimal("3.1400")));
        assert!(!passes(&Scale, 2, 3.141));
        assert!(passes(&Scale, 0, 7));
        assert!(!Scale.accepts_expectation(&Value::Integer(-1)));
    }
}
