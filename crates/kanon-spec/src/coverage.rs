//! Detection of config keys no constraint speaks about.

use std::collections::BTreeSet;

use kanon_core::Config;

use crate::Specification;

/// Keys of `config` targeted by no constraint of `spec`, sorted.
///
/// Any constraint counts, whatever its rule, and so do constraints that are
/// misconfigured.
///
/// ```
/// use kanon_core::Config;
/// use kanon_spec::{find_unspecified, Specification, SpecificationBuilder};
///
/// let spec = Specification::from(
///     SpecificationBuilder::new("s")
///         .constraint("a", "nullable", false, 1)
///         .constraint("b", "nullable", false, 2)
///         .build(),
/// );
/// let config: Config = [("a", 1), ("b", 2), ("c", 3)].into_iter().collect();
///
/// assert_eq!(find_unspecified(&config, &spec).into_iter().collect::<Vec<_>>(), ["c"]);
/// ```
#[must_use]
pub fn find_unspecified(config: &Config, spec: &Specification) -> BTreeSet<String> {
    config
        .keys()
        .filter(|key| !spec.covers(key))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SpecificationBuilder;

    #[test]
    fn test_sorted_output() {
        let config: Config = [("zeta", 1), ("alpha", 2), ("mid.key", 3)]
            .into_iter()
            .collect();
        let unspecified = find_unspecified(&config, &Specification::default());
        assert_eq!(
            unspecified.into_iter().collect::<Vec<_>>(),
            ["alpha", "mid.key", "zeta"]
        );
    }

    #[test]
    fn test_wildcards_cover_keys() {
        let spec = Specification::from(
            SpecificationBuilder::new("s")
                .constraint("db.**", "blank", false, 1)
                .constraint("cache.*.ttl", "min", 0, 2)
                .build(),
        );
        let config: Config = [
            ("db.host", 1),
            ("db.pool.size", 2),
            ("cache.users.ttl", 3),
            ("cache.users.size", 4),
        ]
        .into_iter()
        .collect();

        let unspecified = find_unspecified(&config, &spec);
        assert_eq!(unspecified.len(), 1);
        assert!(unspecified.contains("cache.users.size"));
    }

    #[test]
    fn test_misconfigured_constraint_still_covers() {
        let spec = Specification::from(
            SpecificationBuilder::new("s")
                .constraint("a", "in_list", Vec::<i64>::new(), 1)
                .build(),
        );
        let config: Config = [("a", 1)].into_iter().collect();
        assert!(find_unspecified(&config, &spec).is_empty());
    }
}
