//! Layered configuration loading and declarative validation.
//!
//! kanon merges configuration from ordered sources (`.properties`, TOML,
//! JSON, or any custom [`ConfigFactory`](loader::ConfigFactory)) into one flat
//! [`Config`](core::Config), then checks it against a
//! [`Specification`](spec::Specification) of per-key constraints. Nothing
//! fails fast: every load failure, authoring mistake, misconfigured
//! constraint, violation and uncovered key ends up in one ordered list.
//!
//! # Crates
//!
//! | Crate | Contents |
//! |---|---|
//! | [`core`] | `Config`, `Value`, `ConfigError`, `SourceLine` |
//! | [`loader`] | factories, converters, ordered `Loader` |
//! | [`spec`] | key patterns, rules, `Specification`, `ValidationEngine` |
//! | [`telemetry`] | logging setup |
//!
//! # Example
//!
//! ```no_run
//! use kanon::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = SettingsLoader::new()
//!     .with_optional_file("kanon.toml")?
//!     .with_env_prefix("KANON")
//!     .load()?;
//! init_logging(&LogConfig::from(&settings.logging))?;
//!
//! let report = ValidationRun::from_settings(&settings, FactoryRegistry::with_defaults())
//!     .source("defaults.toml")
//!     .source("app.properties")
//!     .specification(
//!         SpecificationBuilder::new("app.spec")
//!             .constraint("server.port", "range", vec![1, 65535], 1)
//!             .constraint("server.host", "blank", false, 2)
//!             .build(),
//!     )
//!     .execute();
//!
//! report.log_summary();
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod error;
mod run;
pub mod settings;

pub use error::SettingsError;
pub use run::{Report, ValidationRun};
pub use settings::{KanonSettings, LogFormat, LoggingSettings, SettingsLoader, ValidationSettings};

pub use kanon_core as core;
pub use kanon_loader as loader;
pub use kanon_spec as spec;
pub use kanon_telemetry as telemetry;

pub use kanon_loader::FactoryRegistry;
pub use kanon_spec::SpecificationBuilder;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust,ignore
/// use kanon::prelude::*;
/// ```
pub mod prelude {
    pub use kanon_core::{Config, ConfigError, ErrorKind, SourceLine, Value};

    pub use kanon_loader::{ConfigFactory, FactoryRegistry, LoadOutcome, Loader};

    pub use kanon_spec::{
        Predicate, Rule, Specification, SpecificationBuilder, SpecificationPartial,
        ValidationEngine,
    };

    pub use kanon_telemetry::{init_logging, LogConfig};

    pub use crate::{KanonSettings, Report, SettingsLoader, ValidationRun};
}
