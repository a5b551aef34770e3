//! Core types for kanon.
//!
//! This crate holds the data every other kanon crate speaks:
//!
//! - [`Value`] - a heterogeneous configuration value (text, numbers, lists, ...)
//! - [`Config`] - the flat, ordered store of dotted keys and its [`merge`] rule
//! - [`SourceLine`] - `(file, line)` provenance for declarations
//! - [`ConfigError`] - the error family with its message codes and arguments
//!
//! # Example
//!
//! ```
//! use kanon_core::{merge, Config, Value};
//!
//! let s1: Config = [("a", 1), ("b", 2)].into_iter().collect();
//! let s2: Config = [("b", 3), ("c", 4)].into_iter().collect();
//!
//! let merged = merge(merge(Config::new(), s1), s2);
//! assert_eq!(merged.resolve("b"), &Value::Integer(3));
//! assert!(merged.resolve("missing").is_null());
//! ```

#![warn(missing_docs)]

mod config;
pub mod error;
mod source;
mod value;

pub use config::{merge, Config};
pub use error::{ConfigError, ErrorKind};
pub use source::SourceLine;
pub use value::{Value, ValueKind};

/// Re-exported so callers can build decimal values without a direct dependency.
pub use bigdecimal::BigDecimal;
