//! The merged configuration store.
//!
//! A [`Config`] is a flat, ordered map from full dotted keys
//! (`server.http.port`) to [`Value`]s. Sources are combined with [`merge`],
//! which replaces whole values key by key; nested maps are never deep-merged.

use indexmap::IndexMap;

use crate::Value;

static NULL: Value = Value::Null;

/// Flat ordered key/value configuration store.
///
/// # Example
///
/// ```
/// use kanon_core::{Config, Value};
///
/// let defaults: Config = [("a", 1), ("b", 2)].into_iter().collect();
/// let overrides: Config = [("b", 3), ("c", 4)].into_iter().collect();
///
/// let merged = defaults.merge(overrides);
/// assert_eq!(merged.get("b"), Some(&Value::Integer(3)));
/// assert_eq!(merged.len(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    entries: IndexMap<String, Value>,
}

impl Config {
    /// Create an empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Look up `key`, resolving an absent key to [`Value::Null`].
    #[must_use]
    pub fn resolve(&self, key: &str) -> &Value {
        self.entries.get(key).unwrap_or(&NULL)
    }

    /// Returns `true` if `key` is present (even with a null value).
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Store `value` under `key`, returning the value it replaced.
    ///
    /// A replaced key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the store holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries whose key lives under `prefix`, with the prefix stripped.
    ///
    /// ```
    /// use kanon_core::Config;
    ///
    /// let config: Config = [("db.host", "x"), ("db.port", "1"), ("dbx", "y")]
    ///     .into_iter()
    ///     .collect();
    /// let db = config.subset("db");
    /// assert_eq!(db.keys().collect::<Vec<_>>(), ["host", "port"]);
    /// ```
    #[must_use]
    pub fn subset(&self, prefix: &str) -> Self {
        let prefix = format!("{}.", prefix.trim_end_matches('.'));
        self.entries
            .iter()
            .filter_map(|(key, value)| {
                key.strip_prefix(&prefix)
                    .map(|rest| (rest.to_string(), value.clone()))
            })
            .collect()
    }

    /// Overlay `overlay` on this store in place.
    ///
    /// Every overlay key takes the overlay's value; keys only present here are
    /// kept unchanged.
    pub fn merge_from(&mut self, overlay: Self) {
        for (key, value) in overlay.entries {
            self.entries.insert(key, value);
        }
    }

    /// Consume this store and return it with `overlay` applied on top.
    #[must_use]
    pub fn merge(mut self, overlay: Self) -> Self {
        self.merge_from(overlay);
        self
    }
}

/// Merge two configurations; `overlay` wins on every shared key.
///
/// Merging is associative, so loading sources `S1..Sn` in order equals
/// `merge(...merge(merge(empty, S1), S2)..., Sn)`. It is not commutative.
#[must_use]
pub fn merge(base: Config, overlay: Config) -> Config {
    base.merge(overlay)
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Config {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut config = Self::new();
        config.extend(iter);
        config
    }
}

impl<K: Into<String>, V: Into<Value>> Extend<(K, V)> for Config {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl IntoIterator for Config {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Config {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
