//! Key patterns binding constraints to config keys.
//!
//! A pattern is a dotted key whose segments are either literal, `*` (exactly
//! one segment) or `**` (one or more segments):
//!
//! | Pattern | Matches | Does not match |
//! |---|---|---|
//! | `db.host` | `db.host` | `db.hostname` |
//! | `db.*.host` | `db.primary.host` | `db.host`, `db.a.b.host` |
//! | `db.**` | `db.host`, `db.pool.size` | `db` |

use std::fmt;
use std::str::FromStr;

use kanon_core::{Config, Value};
use thiserror::Error;

/// Why a key pattern could not be parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyPatternError {
    /// The pattern is empty.
    #[error("key pattern is empty")]
    Empty,

    /// A segment between two dots is empty.
    #[error("segment {index} is empty")]
    EmptySegment {
        /// 0-based segment index.
        index: usize,
    },

    /// A wildcard is mixed with literal characters inside one segment.
    #[error("segment '{segment}' mixes a wildcard with literal text")]
    PartialWildcard {
        /// The offending segment.
        segment: String,
    },
}

/// One segment of a [`KeyPattern`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Matches exactly this text.
    Literal(String),
    /// `*`: matches any single segment.
    Any,
    /// `**`: matches one or more segments.
    AnyDeep,
}

/// Parsed dotted key pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl KeyPattern {
    /// Parse a pattern.
    ///
    /// # Errors
    ///
    /// Returns [`KeyPatternError`] for empty patterns, empty segments and
    /// segments such as `db*` that mix wildcards with text.
    pub fn parse(pattern: &str) -> Result<Self, KeyPatternError> {
        if pattern.is_empty() {
            return Err(KeyPatternError::Empty);
        }

        let segments = pattern
            .split('.')
            .enumerate()
            .map(|(index, segment)| match segment {
                "" => Err(KeyPatternError::EmptySegment { index }),
                "*" => Ok(Segment::Any),
                "**" => Ok(Segment::AnyDeep),
                s if s.contains('*') => Err(KeyPatternError::PartialWildcard {
                    segment: s.to_string(),
                }),
                s => Ok(Segment::Literal(s.to_string())),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            raw: pattern.to_string(),
            segments,
        })
    }

    /// The pattern as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Parsed segments.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns `true` if the pattern has no wildcard.
    #[must_use]
    pub fn is_literal(&self) -> bool {
        self.segments
            .iter()
            .all(|segment| matches!(segment, Segment::Literal(_)))
    }

    /// Returns `true` if `key` is matched by this pattern.
    #[must_use]
    pub fn matches(&self, key: &str) -> bool {
        let parts: Vec<&str> = key.split('.').collect();
        match_segments(&self.segments, &parts)
    }

    /// Keys targeted by this pattern in `config`, with their values.
    ///
    /// A literal pattern always targets its own key, resolving to `Null` when
    /// the key is absent. A wildcard pattern targets the matching keys present
    /// in the config, in config order.
    pub fn targets<'a>(&'a self, config: &'a Config) -> Vec<(&'a str, &'a Value)> {
        if self.is_literal() {
            return vec![(self.raw.as_str(), config.resolve(&self.raw))];
        }
        config
            .iter()
            .filter(|(key, _)| self.matches(key))
            .collect()
    }
}

fn match_segments(pattern: &[Segment], key: &[&str]) -> bool {
    match pattern.split_first() {
        None => key.is_empty(),
        Some((Segment::Literal(literal), rest)) => {
            key.first() == Some(&literal.as_str()) && match_segments(rest, &key[1..])
        }
        Some((Segment::Any, rest)) => !key.is_empty() && match_segments(rest, &key[1..]),
        Some((Segment::AnyDeep, rest)) => {
            (1..=key.len()).any(|taken| match_segments(rest, &key[taken..]))
        }
    }
}

impl FromStr for KeyPattern {
    type Err = KeyPatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for KeyPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(s: &str) -> KeyPattern {
        KeyPattern::parse(s).unwrap()
    }

    #[test]
    fn test_parse_literal() {
        let p = pattern("server.http.port");
        assert!(p.is_literal());
        assert_eq!(p.segments().len(), 3);
        assert_eq!(p.to_string(), "server.http.port");
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(KeyPattern::parse(""), Err(KeyPatternError::Empty));
        assert_eq!(
            KeyPattern::parse("db..host"),
            Err(KeyPatternError::EmptySegment { index: 1 })
        );
        assert_eq!(
            KeyPattern::parse("db*.host"),
            Err(KeyPatternError::PartialWildcard {
                segment: "db*".to_string()
            })
        );
        assert!(KeyPattern::parse("db.").is_err());
    }

    #[test]
    fn test_literal_matching() {
        let p = pattern("db.host");
        assert!(p.matches("db.host"));
        assert!(!p.matches("db.hostname"));
        assert!(!p.matches("db"));
        assert!(!p.matches("db.host.name"));
    }

    #[test]
    fn test_single_wildcard() {
        let p = pattern("db.*.host");
        assert!(p.matches("db.primary.host"));
        assert!(!p.matches("db.host"));
        assert!(!p.matches("db.a.b.host"));
    }

    #[test]
    fn test_deep_wildcard() {
        let p = pattern("db.**");
        assert!(p.matches("db.host"));
        assert!(p.matches("db.pool.size.max"));
        assert!(!p.matches("db"));
        assert!(!p.matches("cache.host"));

        let middle = pattern("**.port");
        assert!(middle.matches("server.port"));
        assert!(middle.matches("a.b.c.port"));
        assert!(!middle.matches("port"));
    }

    #[test]
    fn test_literal_targets_absent_key_as_null() {
        let config = Config::new();
        let p = pattern("missing.key");
        assert_eq!(p.targets(&config), vec![("missing.key", &Value::Null)]);
    }

    #[test]
    fn test_wildcard_targets_in_config_order() {
        let config: Config = [("db.b.host", "2"), ("other", "x"), ("db.a.host", "1")]
            .into_iter()
            .collect();
        let db_hosts = pattern("db.*.host");
        let keys: Vec<&str> = db_hosts
            .targets(&config)
            .into_iter()
            .map(|(key, _)| key)
            .collect();
        assert_eq!(keys, ["db.b.host", "db.a.host"]);
        assert!(pattern("none.*").targets(&config).is_empty());
    }

    #[test]
    fn test_from_str() {
        let p: KeyPattern = "a.*".parse().unwrap();
        assert!(!p.is_literal());
    }
}
