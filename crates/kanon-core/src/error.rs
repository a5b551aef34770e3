//! Configuration error types and their message model.
//!
//! Every [`ConfigError`] is a self-describing value: a stable message
//! [`code`](ConfigError::code), a shared [`default_code`](ConfigError::default_code)
//! used when no template exists for the specific code, and positional
//! [`arguments`](ConfigError::arguments) for the message template. Rendering
//! human-readable text from those belongs to the caller; `Display` output is
//! meant for logs only.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::{SourceLine, Value};

/// Stable message codes.
pub mod codes {
    /// Fallback code shared by every file and loading error.
    pub const FILE_ERROR: &str = "kanon.file.error";
    /// A source could not be converted.
    pub const FAILED_TO_LOAD: &str = "kanon.file.load.failed";
    /// No registered factory supports a source.
    pub const NO_SUITABLE_FACTORY: &str = "kanon.file.factory.missing";
    /// Fallback code for constraint violations.
    pub const CONSTRAINT_VIOLATED: &str = "kanon.constraint.violated";
    /// Fallback code for misconfigured constraints.
    pub const CONSTRAINT_MISCONFIGURED: &str = "kanon.constraint.misconfigured";
    /// Config keys without any constraint.
    pub const KEYS_WITHOUT_SPECIFICATION: &str = "kanon.keys.unspecified";
    /// Fallback code for specification authoring errors.
    pub const SPECIFICATION_ERROR: &str = "kanon.specification.error";
    /// A constraint names a rule that does not exist.
    pub const UNKNOWN_CONSTRAINT: &str = "kanon.specification.constraint.unknown";
    /// A constraint key pattern is malformed.
    pub const INVALID_KEY_PATTERN: &str = "kanon.specification.key.invalid";
}

/// Broad classification of a [`ConfigError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A source could not be loaded.
    Load,
    /// The specification itself is malformed.
    Authoring,
    /// A constraint's expectation is malformed.
    Misconfiguration,
    /// A value failed a constraint.
    Violation,
    /// Config keys are not covered by the specification.
    Coverage,
}

/// Errors collected while loading and validating configuration.
///
/// None of these abort a run; loaders and the validation engine return them
/// as an ordered collection next to whatever they could build.
#[derive(Error, Debug, Clone)]
pub enum ConfigError {
    /// A value failed an applicable, well-formed constraint.
    #[error("value '{value}' of '{key}' violates {constraint} [{expectation}] declared at {source_line}")]
    ConstraintViolated {
        /// The offending key.
        key: String,
        /// The offending value.
        value: Value,
        /// Rule name of the constraint.
        constraint: String,
        /// The constraint's expectation payload.
        expectation: Value,
        /// Where the constraint was declared.
        source_line: SourceLine,
    },

    /// A constraint's expectation payload is malformed for its rule.
    #[error("{constraint} constraint declared at {source_line} has invalid expectation [{expectation}]")]
    ConstraintMisconfigured {
        /// Rule name of the constraint.
        constraint: String,
        /// The rejected expectation payload.
        expectation: Value,
        /// Where the constraint was declared.
        source_line: SourceLine,
    },

    /// A source could not be converted into a config fragment.
    #[error("failed to load {} with {factory} factory: {cause}", file.display())]
    FailedToLoad {
        /// The source file.
        file: PathBuf,
        /// Name of the factory that attempted the conversion.
        factory: String,
        /// Underlying failure.
        #[source]
        cause: Arc<dyn std::error::Error + Send + Sync>,
    },

    /// No registered factory supports the source.
    #[error("no configuration factory supports {}", file.display())]
    NoSuitableFactory {
        /// The source file.
        file: PathBuf,
    },

    /// Config keys that no constraint targets.
    #[error("keys without specification: {}", keys.iter().cloned().collect::<Vec<_>>().join(", "))]
    KeysWithoutSpecification {
        /// The uncovered keys, sorted.
        keys: BTreeSet<String>,
    },

    /// A constraint names a rule that does not exist.
    #[error("unknown constraint '{name}' on '{key}' at {source_line}")]
    UnknownConstraint {
        /// The unrecognised rule name.
        name: String,
        /// The key pattern the constraint was declared for.
        key: String,
        /// Where the constraint was declared.
        source_line: SourceLine,
    },

    /// A constraint key pattern is malformed.
    #[error("invalid key pattern '{pattern}' at {source_line}: {reason}")]
    InvalidKeyPattern {
        /// The rejected pattern.
        pattern: String,
        /// Why it was rejected.
        reason: String,
        /// Where the constraint was declared.
        source_line: SourceLine,
    },
}

impl ConfigError {
    /// Create a constraint violation.
    pub fn constraint_violated(
        key: impl Into<String>,
        value: Value,
        constraint: impl Into<String>,
        expectation: Value,
        source_line: SourceLine,
    ) -> Self {
        Self::ConstraintViolated {
            key: key.into(),
            value,
            constraint: constraint.into(),
            expectation,
            source_line,
        }
    }

    /// Create a constraint misconfiguration.
    pub fn constraint_misconfigured(
        constraint: impl Into<String>,
        expectation: Value,
        source_line: SourceLine,
    ) -> Self {
        Self::ConstraintMisconfigured {
            constraint: constraint.into(),
            expectation,
            source_line,
        }
    }

    /// Wrap a factory failure.
    pub fn failed_to_load<E>(file: impl Into<PathBuf>, factory: impl Into<String>, cause: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::FailedToLoad {
            file: file.into(),
            factory: factory.into(),
            cause: Arc::new(cause),
        }
    }

    /// Create a missing-factory error.
    pub fn no_suitable_factory(file: impl Into<PathBuf>) -> Self {
        Self::NoSuitableFactory { file: file.into() }
    }

    /// Create a coverage error for the given keys.
    pub fn keys_without_specification(keys: BTreeSet<String>) -> Self {
        Self::KeysWithoutSpecification { keys }
    }

    /// Create an unknown-constraint authoring error.
    pub fn unknown_constraint(
        name: impl Into<String>,
        key: impl Into<String>,
        source_line: SourceLine,
    ) -> Self {
        Self::UnknownConstraint {
            name: name.into(),
            key: key.into(),
            source_line,
        }
    }

    /// Create an invalid-key-pattern authoring error.
    pub fn invalid_key_pattern(
        pattern: impl Into<String>,
        reason: impl Into<String>,
        source_line: SourceLine,
    ) -> Self {
        Self::InvalidKeyPattern {
            pattern: pattern.into(),
            reason: reason.into(),
            source_line,
        }
    }

    /// Classification of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::ConstraintViolated { .. } => ErrorKind::Violation,
            Self::ConstraintMisconfigured { .. } => ErrorKind::Misconfiguration,
            Self::FailedToLoad { .. } | Self::NoSuitableFactory { .. } => ErrorKind::Load,
            Self::KeysWithoutSpecification { .. } => ErrorKind::Coverage,
            Self::UnknownConstraint { .. } | Self::InvalidKeyPattern { .. } => ErrorKind::Authoring,
        }
    }

    /// Stable, dot-namespaced message code.
    ///
    /// Constraint errors embed the rule name, e.g.
    /// `kanon.constraint.max_size.violated`.
    #[must_use]
    pub fn code(&self) -> String {
        match self {
            Self::ConstraintViolated { constraint, .. } => {
                format!("kanon.constraint.{constraint}.violated")
            }
            Self::ConstraintMisconfigured { constraint, .. } => {
                format!("kanon.constraint.{constraint}.misconfigured")
            }
            Self::FailedToLoad { .. } => codes::FAILED_TO_LOAD.to_string(),
            Self::NoSuitableFactory { .. } => codes::NO_SUITABLE_FACTORY.to_string(),
            Self::KeysWithoutSpecification { .. } => codes::KEYS_WITHOUT_SPECIFICATION.to_string(),
            Self::UnknownConstraint { .. } => codes::UNKNOWN_CONSTRAINT.to_string(),
            Self::InvalidKeyPattern { .. } => codes::INVALID_KEY_PATTERN.to_string(),
        }
    }

    /// Fallback message code used when no template exists for [`code`](Self::code).
    #[must_use]
    pub const fn default_code(&self) -> &'static str {
        match self {
            Self::ConstraintViolated { .. } => codes::CONSTRAINT_VIOLATED,
            Self::ConstraintMisconfigured { .. } => codes::CONSTRAINT_MISCONFIGURED,
            Self::FailedToLoad { .. } | Self::NoSuitableFactory { .. } => codes::FILE_ERROR,
            Self::KeysWithoutSpecification { .. } => codes::KEYS_WITHOUT_SPECIFICATION,
            Self::UnknownConstraint { .. } | Self::InvalidKeyPattern { .. } => {
                codes::SPECIFICATION_ERROR
            }
        }
    }

    /// Positional arguments matching the placeholders of the message template.
    #[must_use]
    pub fn arguments(&self) -> Vec<Value> {
        match self {
            Self::ConstraintViolated {
                key,
                value,
                expectation,
                source_line,
                ..
            } => vec![
                Value::from(key.as_str()),
                value.clone(),
                expectation.clone(),
                Value::from(source_line.file()),
                Value::from(source_line.line()),
            ],
            Self::ConstraintMisconfigured {
                constraint,
                expectation,
                source_line,
            } => vec![
                Value::from(constraint.as_str()),
                expectation.clone(),
                Value::from(source_line.file()),
                Value::from(source_line.line()),
            ],
            Self::FailedToLoad {
                file,
                factory,
                cause,
            } => vec![
                Value::from(file.display().to_string()),
                Value::from(factory.as_str()),
                Value::from(cause.to_string()),
            ],
            Self::NoSuitableFactory { file } => vec![Value::from(file.display().to_string())],
            Self::KeysWithoutSpecification { keys } => {
                vec![Value::List(keys.iter().map(|k| Value::from(k.as_str())).collect())]
            }
            Self::UnknownConstraint {
                name,
                key,
                source_line,
            } => vec![
                Value::from(name.as_str()),
                Value::from(key.as_str()),
                Value::from(source_line.file()),
                Value::from(source_line.line()),
            ],
            Self::InvalidKeyPattern {
                pattern,
                reason,
                source_line,
            } => vec![
                Value::from(pattern.as_str()),
                Value::from(reason.as_str()),
                Value::from(source_line.file()),
                Value::from(source_line.line()),
            ],
        }
    }

    /// Where the offending declaration lives, for constraint and authoring errors.
    #[must_use]
    pub const fn source_line(&self) -> Option<&SourceLine> {
        match self {
            Self::ConstraintViolated { source_line, .. }
            | Self::ConstraintMisconfigured { source_line, .. }
            | Self::UnknownConstraint { source_line, .. }
            | Self::InvalidKeyPattern { source_line, .. } => Some(source_line),
            _ => None,
        }
    }

    /// The config key this error is about, if any.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::ConstraintViolated { key, .. } | Self::UnknownConstraint { key, .. } => Some(key),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    fn line() -> SourceLine {
        SourceLine::new("server.rules", 7)
    }

    #[test]
    fn test_violation_message_model() {
        let err = ConfigError::constraint_violated(
            "server.name",
            Value::from("ABCDEF"),
            "max_size",
            Value::from(5),
            line(),
        );
        assert_eq!(err.kind(), ErrorKind::Violation);
        assert_eq!(err.code(), "kanon.constraint.max_size.violated");
        assert_eq!(err.default_code(), codes::CONSTRAINT_VIOLATED);
        assert_eq!(
            err.arguments(),
            vec![
                Value::from("server.name"),
                Value::from("ABCDEF"),
                Value::from(5),
                Value::from("server.rules"),
                Value::from(7),
            ]
        );
        assert_eq!(err.key(), Some("server.name"));
        assert!(err.to_string().contains("server.rules:7"));
    }

    #[test]
    fn test_misconfiguration_message_model() {
        let err = ConfigError::constraint_misconfigured("in_list", Value::List(Vec::new()), line());
        assert_eq!(err.kind(), ErrorKind::Misconfiguration);
        assert_eq!(err.code(), "kanon.constraint.in_list.misconfigured");
        assert_eq!(err.default_code(), codes::CONSTRAINT_MISCONFIGURED);
        assert_eq!(err.arguments().len(), 4);
        assert_eq!(err.source_line(), Some(&line()));
    }

    #[test]
    fn test_load_errors_share_fallback_code() {
        let cause = io::Error::new(io::ErrorKind::NotFound, "missing");
        let failed = ConfigError::failed_to_load("app.toml", "toml", cause);
        let missing = ConfigError::no_suitable_factory("app.yaml");

        assert_eq!(failed.default_code(), codes::FILE_ERROR);
        assert_eq!(missing.default_code(), codes::FILE_ERROR);
        assert_ne!(failed.code(), missing.code());
        assert_eq!(failed.kind(), ErrorKind::Load);
        assert_eq!(missing.kind(), ErrorKind::Load);
    }

    #[test]
    fn test_failed_to_load_keeps_cause_and_factory() {
        let cause = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let err = ConfigError::failed_to_load("app.toml", "toml", cause);

        let source = std::error::Error::source(&err).expect("cause is chained");
        assert_eq!(source.to_string(), "denied");
        assert_eq!(
            err.arguments(),
            vec![Value::from("app.toml"), Value::from("toml"), Value::from("denied")]
        );
        assert!(err.to_string().contains("toml factory"));
    }

    #[test]
    fn test_keys_without_specification() {
        let keys: BTreeSet<String> = ["b", "a"].iter().map(ToString::to_string).collect();
        let err = ConfigError::keys_without_specification(keys);
        assert_eq!(err.kind(), ErrorKind::Coverage);
        assert_eq!(err.to_string(), "keys without specification: a, b");
        assert_eq!(err.arguments(), vec![Value::from(vec!["a", "b"])]);
    }

    #[test]
    fn test_authoring_errors() {
        let unknown = ConfigError::unknown_constraint("max_sise", "server.name", line());
        let invalid = ConfigError::invalid_key_pattern("a..b", "empty segment", line());
        assert_eq!(unknown.kind(), ErrorKind::Authoring);
        assert_eq!(invalid.kind(), ErrorKind::Authoring);
        assert_eq!(unknown.default_code(), codes::SPECIFICATION_ERROR);
        assert_eq!(invalid.code(), codes::INVALID_KEY_PATTERN);
    }
}
