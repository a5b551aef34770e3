//! Logging setup for kanon.
//!
//! kanon logs through `tracing` everywhere; this crate installs the
//! subscriber that turns those events into output:
//!
//! - **JSON** lines for production and log shipping
//! - **Pretty** multi-line output for development
//!
//! # Example
//!
//! ```rust,ignore
//! use kanon_telemetry::{init_logging, LogConfig};
//!
//! fn main() -> Result<(), kanon_telemetry::TelemetryError> {
//!     init_logging(&LogConfig::production().with_level("kanon_spec=debug,info"))?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod logging;

pub use error::TelemetryError;
pub use logging::{create_env_filter, init_logging, LogConfig};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
