//! Conversion between native document representations and [`Config`].

use kanon_core::Config;

/// Converts a format's native representation to and from a [`Config`].
///
/// Both directions are total over well-formed input. `to_native` may lose
/// information the format cannot express (text formats normalise every
/// scalar to text, TOML has no null); each implementation documents its own
/// losses. A converter for a given format satisfies the round-trip property
/// `from_native(to_native(c)) == c` modulo those documented normalisations.
pub trait Converter {
    /// The format's in-memory document type.
    type Native;

    /// Flatten a native document into a config fragment.
    fn from_native(&self, native: Self::Native) -> Config;

    /// Render a config as a native document.
    fn to_native(&self, config: &Config) -> Self::Native;
}

/// Top-level table holding per-profile overrides in structured formats.
pub const PROFILES_KEY: &str = "profiles";

/// Apply the `profiles.<name>` overlay of a flattened structured document.
///
/// Entries below `profiles.<profile>.` replace base entries with the same
/// remaining key. Every `profiles.*` entry is removed from the result,
/// whether or not a profile is selected.
pub fn overlay_profile(fragment: Config, profile: Option<&str>) -> Config {
    let section = format!("{PROFILES_KEY}.");
    let selected = profile.map(|name| format!("{section}{name}."));

    let mut base = Config::new();
    let mut overlay = Config::new();
    for (key, value) in fragment {
        if key == PROFILES_KEY {
            continue;
        }
        if !key.starts_with(&section) {
            base.insert(key, value);
            continue;
        }
        if let Some(own) = selected.as_deref().and_then(|s| key.strip_prefix(s)) {
            overlay.insert(own, value);
        }
    }
    base.merge(overlay)
}

pub(crate) fn join_key(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kanon_core::Value;

    fn fragment() -> Config {
        [
            ("db.host", "localhost"),
            ("db.port", "5432"),
            ("profiles.prod.db.host", "db.internal"),
            ("profiles.test.db.port", "15432"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_selected_profile_overrides_base() {
        let config = overlay_profile(fragment(), Some("prod"));
        assert_eq!(config.get("db.host"), Some(&Value::from("db.internal")));
        assert_eq!(config.get("db.port"), Some(&Value::from("5432")));
        assert_eq!(config.len(), 2);
    }

    #[test]
    fn test_no_profile_drops_profile_section() {
        let config = overlay_profile(fragment(), None);
        assert_eq!(config.get("db.host"), Some(&Value::from("localhost")));
        assert!(config.keys().all(|k| !k.starts_with("profiles")));
    }

    #[test]
    fn test_unknown_profile_is_base_only() {
        let config = overlay_profile(fragment(), Some("staging"));
        assert_eq!(config.len(), 2);
        assert_eq!(config.get("db.port"), Some(&Value::from("5432")));
    }

    #[test]
    fn test_join_key() {
        assert_eq!(join_key("", "a"), "a");
        assert_eq!(join_key("a.b", "c"), "a.b.c");
    }
}
