//! Size rules for text, lists and maps.

use kanon_core::Value;

use crate::{Check, Rule};

fn bound(value: &Value) -> Option<usize> {
    value.as_i64().and_then(|n| usize::try_from(n).ok())
}

fn bounds(value: &Value) -> Option<(usize, usize)> {
    match value.as_list()? {
        [lo, hi] => {
            let (lo, hi) = (bound(lo)?, bound(hi)?);
            (lo <= hi).then_some((lo, hi))
        }
        _ => None,
    }
}

fn is_sized(value: &Value) -> bool {
    value.size().is_some()
}

/// `min_size: n` requires at least `n` characters or elements.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinSize;

impl Rule for MinSize {
    fn name(&self) -> &str {
        "min_size"
    }

    fn accepts_expectation(&self, expectation: &Value) -> bool {
        bound(expectation).is_some()
    }

    fn supports(&self, _: &Value, value: &Value) -> bool {
        is_sized(value)
    }

    fn check(&self, check: &Check<'_>) -> bool {
        matches!(
            (check.value.size(), bound(check.expectation)),
            (Some(size), Some(min)) if size >= min
        )
    }
}

/// `max_size: n` allows at most `n` characters or elements.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaxSize;

impl Rule for MaxSize {
    fn name(&self) -> &str {
        "max_size"
    }

    fn accepts_expectation(&self, expectation: &Value) -> bool {
        bound(expectation).is_some()
    }

    fn supports(&self, _: &Value, value: &Value) -> bool {
        is_sized(value)
    }

    fn check(&self, check: &Check<'_>) -> bool {
        matches!(
            (check.value.size(), bound(check.expectation)),
            (Some(size), Some(max)) if size <= max
        )
    }
}

/// `size: [lo, hi]` requires a size within the inclusive range.
#[derive(Debug, Clone, Copy, Default)]
pub struct Size;

impl Rule for Size {
    fn name(&self) -> &str {
        "size"
    }

    fn accepts_expectation(&self, expectation: &Value) -> bool {
        bounds(expectation).is_some()
    }

    fn supports(&self, _: &Value, value: &Value) -> bool {
        is_sized(value)
    }

    fn check(&self, check: &Check<'_>) -> bool {
        matches!(
            (check.value.size(), bounds(check.expectation)),
            (Some(size), Some((lo, hi))) if (lo..=hi).contains(&size)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kanon_core::Config;

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

    #[test]
    fn test_min_and_max_size() {
        assert!(passes(&MinSize, 3, "abc"));
        assert!(!passes(&MinSize, 3, "ab"));
        assert!(passes(&MaxSize, 5, "abcde"));
        assert!(!passes(&MaxSize, 5, "ABCDEF"));
        assert!(passes(&MaxSize, 2, vec![1, 2]));
        assert!(!passes(&MaxSize, 1, vec![1, 2]));
    }

    #[test]
    fn test_size_counts_characters() {
        assert!(passes(&MaxSize, 3, "żółw".chars().take(3).collect::<String>()));
        assert!(passes(&Size, vec![4, 4], "żółw"));
    }

    #[test]
    fn test_size_range() {
        assert!(passes(&Size, vec![1, 3], "ab"));
        assert!(!passes(&Size, vec![1, 3], "abcd"));
        assert!(passes(&Size, vec![0, 0], Vec::<i64>::new()));
    }

    #[test]
    fn test_expectation_shape() {
        assert!(MinSize.accepts_expectation(&Value::Integer(0)));
        assert!(!MinSize.accepts_expectation(&Value::Integer(-1)));
        assert!(!MaxSize.accepts_expectation(&Value::from("5")));
        assert!(Size.accepts_expectation(&Value::from(vec![1, 2])));
        assert!(!Size.accepts_expectation(&Value::from(vec![3, 2])));
        assert!(!Size.accepts_expectation(&Value::from(vec![1, 2, 3])));
        assert!(!Size.accepts_expectation(&Value::Integer(2)));
    }

    #[test]
    fn test_numbers_are_not_sized() {
        assert!(!MaxSize.supports(&Value::Integer(5), &Value::Integer(123_456)));
        assert!(MaxSize.supports(&Value::Integer(5), &Value::from("x")));
    }
}
