//! Built-in rule catalogue.
//!
//! | Rule | Expectation | Applies to |
//! |---|---|---|
//! | `blank` | bool | text |
//! | `nullable` | bool | any |
//! | `email`, `url`, `credit_card` | bool | text |
//! | `matches` | regex | text |
//! | `in_list` | non-empty list | any |
//! | `not_equal` | non-null value | any |
//! | `min`, `max` | number or text | same family |
//! | `range` | `[lo, hi]` | same family |
//! | `min_size`, `max_size` | integer ≥ 0 | text, list, map |
//! | `size` | `[lo, hi]` integers | text, list, map |
//! | `scale` | integer ≥ 0 | numbers |
//! | `validator` | opaque predicate | any |

use std::sync::Arc;

use crate::Rule;

mod membership;
mod numeric;
mod predicate;
mod size;
mod text;

pub use membership::{InList, NotEqual, Nullable};
pub use numeric::{Max, Min, Range, Scale};
pub use predicate::Validator;
pub use size::{MaxSize, MinSize, Size};
pub use text::{Blank, CreditCard, Email, Matches, Url};

/// Names of every built-in rule.
pub const NAMES: &[&str] = &[
    "blank",
    "nullable",
    "email",
    "url",
    "credit_card",
    "matches",
    "in_list",
    "not_equal",
    "min",
    "max",
    "range",
    "min_size",
    "max_size",
    "size",
    "scale",
    "validator",
];

/// Look up a built-in rule by name.
///
/// `validator` resolves to a rule without a predicate, which reports itself
/// misconfigured; predicates are attached through
/// [`SpecificationBuilder::validator`](crate::SpecificationBuilder::validator).
#[must_use]
pub fn by_name(name: &str) -> Option<Arc<dyn Rule>> {
    let rule: Arc<dyn Rule> = match name {
        "blank" => Arc::new(Blank),
        "nullable" => Arc::new(Nullable),
        "email" => Arc::new(Email),
        "url" => Arc::new(Url),
        "credit_card" => Arc::new(CreditCard),
        "matches" => Arc::new(Matches::default()),
        "in_list" => Arc::new(InList),
        "not_equal" => Arc::new(NotEqual),
        "min" => Arc::new(Min),
        "max" => Arc::new(Max),
        "range" => Arc::new(Range),
        "min_size" => Arc::new(MinSize),
        "max_size" => Arc::new(MaxSize),
        "size" => Arc::new(Size),
        "scale" => Arc::new(Scale),
        "validator" => Arc::new(Validator::default()),
        _ => return None,
    };
    Some(rule)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_name_resolves() {
        for name in NAMES {
            let rule = by_name(name).unwrap();
            assert_eq!(rule.name(), *name);
        }
    }

    #[test]
    fn test_unknown_name() {
        assert!(by_name("maxSize").is_none());
        assert!(by_name("").is_none());
    }
}
