//! Loading of configuration sources for kanon.
//!
//! A [`FactoryRegistry`] maps each source file to a [`ConfigFactory`], which
//! converts it into a flat config fragment. The [`Loader`] applies the
//! fragments in declaration order, collecting failures instead of aborting.
//!
//! Built-in factories:
//!
//! | Factory | Extension | Profiles |
//! |---|---|---|
//! | [`PropertiesFactory`] | `.properties` | `%profile.key=value` entries |
//! | [`TomlFactory`] | `.toml` | `[profiles.<name>]` tables |
//! | [`JsonFactory`] | `.json` | `"profiles": { "<name>": {..} }` |
//!
//! Text values may reference other keys with `${key}` or `${key:default}`.
//!
//! # Example
//!
//! ```no_run
//! use kanon_loader::{FactoryRegistry, Loader};
//!
//! let outcome = Loader::new(FactoryRegistry::with_defaults())
//!     .source("defaults.toml")
//!     .source("overrides.json")
//!     .load();
//!
//! println!("{} keys, {} errors", outcome.config.len(), outcome.errors.len());
//! ```

#![warn(missing_docs)]

mod convert;
mod error;
mod factory;
mod interpolate;
mod json_file;
mod loader;
mod properties;
mod toml_file;

pub use convert::{overlay_profile, Converter, PROFILES_KEY};
pub use error::LoadError;
pub use factory::{ConfigFactory, FactoryRegistry};
pub use interpolate::resolve_placeholders;
pub use json_file::{JsonConverter, JsonFactory};
pub use loader::{LoadOutcome, Loader, Source};
pub use properties::{
    parse_properties, render_properties, Properties, PropertiesConverter, PropertiesFactory,
};
pub use toml_file::{TomlConverter, TomlFactory};
