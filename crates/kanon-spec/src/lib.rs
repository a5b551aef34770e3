//! Specifications and constraint validation for kanon.
//!
//! A [`Specification`] is the set of [`Constraint`]s a configuration must
//! satisfy. Each constraint binds a [`Rule`] to a [`KeyPattern`], an
//! expectation and the line that declared it. The [`ValidationEngine`]
//! evaluates every constraint against a merged config and returns all
//! errors at once; nothing fails fast.
//!
//! # Example
//!
//! ```
//! use kanon_core::{Config, ConfigError};
//! use kanon_spec::{Specification, SpecificationBuilder, ValidationEngine};
//!
//! let spec: Specification = [
//!     SpecificationBuilder::new("server.spec")
//!         .constraint("server.port", "range", vec![1, 65535], 1)
//!         .constraint("server.mode", "in_list", vec!["dev", "prod"], 2)
//!         .build(),
//! ]
//! .into_iter()
//! .collect();
//!
//! let config: Config = [("server.port", 70000)].into_iter().collect();
//! let errors = ValidationEngine::new().validate(&config, &spec);
//!
//! assert_eq!(errors.len(), 1);
//! assert_eq!(errors[0].code(), "kanon.constraint.range.violated");
//! ```

#![warn(missing_docs)]

mod constraint;
mod coverage;
mod engine;
mod key;
pub mod rules;
mod specification;

pub use constraint::{Check, Constraint, Predicate, Rule};
pub use coverage::find_unspecified;
pub use engine::ValidationEngine;
pub use key::{KeyPattern, KeyPatternError, Segment};
pub use specification::{Specification, SpecificationBuilder, SpecificationPartial};
