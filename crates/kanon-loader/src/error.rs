//! Factory failure types.

use std::path::PathBuf;
use thiserror::Error;

/// Why a factory could not turn a source into a config fragment.
///
/// The loader never propagates these directly; it wraps them into
/// [`ConfigError::FailedToLoad`](kanon_core::ConfigError::FailedToLoad)
/// together with the file and the factory name.
#[derive(Error, Debug)]
pub enum LoadError {
    /// Failed to read the source file.
    #[error("failed to read {}", path.display())]
    Read {
        /// Path to the file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// TOML parsing error.
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON parsing error.
    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The document root is not a table/object.
    #[error("{format} document root must be an object")]
    RootNotObject {
        /// Format name.
        format: &'static str,
    },

    /// Malformed properties content.
    #[error("malformed properties at line {line}: {reason}")]
    Properties {
        /// 1-based line number.
        line: usize,
        /// Explanation of the problem.
        reason: String,
    },

    /// A `${name}` placeholder could not be resolved.
    #[error("unresolved placeholder ${{{name}}} in '{key}'")]
    UnresolvedPlaceholder {
        /// Key whose value holds the placeholder.
        key: String,
        /// The referenced key.
        name: String,
    },

    /// Placeholders refer to each other in a cycle.
    #[error("placeholder cycle while resolving '{key}'")]
    PlaceholderCycle {
        /// Key whose resolution looped.
        key: String,
    },
}

impl LoadError {
    /// Create a new read error.
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Create a new properties syntax error.
    pub fn properties(line: usize, reason: impl Into<String>) -> Self {
        Self::Properties {
            line,
            reason: reason.into(),
        }
    }

    /// Create a new unresolved-placeholder error.
    pub fn unresolved(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self::UnresolvedPlaceholder {
            key: key.into(),
            name: name.into(),
        }
    }
}
