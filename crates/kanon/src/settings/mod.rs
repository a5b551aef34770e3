//! Settings for kanon itself.
//!
//! These control how a [`ValidationRun`](crate::ValidationRun) behaves, not
//! the configuration being validated.
//!
//! ```toml
//! [validation]
//! strict = false
//! parallelism = 4
//! profile = "prod"
//!
//! [logging]
//! enabled = true
//! level = "info"
//! format = "json"
//! ```

mod loader;

pub use loader::SettingsLoader;

use kanon_telemetry::LogConfig;
use serde::{Deserialize, Serialize};

use crate::SettingsError;

/// Root settings structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct KanonSettings {
    /// Validation behaviour.
    #[serde(default)]
    pub validation: ValidationSettings,

    /// Log output.
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl KanonSettings {
    /// Checks values serde cannot.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidValue`] for zero parallelism or an
    /// unparsable log level.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.validation.parallelism == 0 {
            return Err(SettingsError::invalid_value(
                "validation.parallelism",
                "must be at least 1",
            ));
        }

        if let Some(profile) = &self.validation.profile {
            if profile.trim().is_empty() {
                return Err(SettingsError::invalid_value(
                    "validation.profile",
                    "must not be blank",
                ));
            }
        }

        if self.logging.enabled {
            kanon_telemetry::create_env_filter(&self.logging.level)
                .map_err(|e| SettingsError::invalid_value("logging.level", e.to_string()))?;
        }

        Ok(())
    }
}

/// `[validation]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ValidationSettings {
    /// Report config keys no constraint covers.
    #[serde(default)]
    pub strict: bool,

    /// Worker threads for constraint evaluation.
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,

    /// Profile applied to sources added without one.
    #[serde(default)]
    pub profile: Option<String>,
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self {
            strict: false,
            parallelism: default_parallelism(),
            profile: None,
        }
    }
}

const fn default_parallelism() -> usize {
    1
}

/// Log format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON lines.
    #[default]
    Json,
    /// Human-readable multi-line output.
    Pretty,
}

/// `[logging]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingSettings {
    /// Enable logging.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Filter directive (`info`, `kanon_spec=debug,warn`, ...).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

const fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl From<&LoggingSettings> for LogConfig {
    fn from(settings: &LoggingSettings) -> Self {
        let preset = match settings.format {
            LogFormat::Json => LogConfig::production(),
            LogFormat::Pretty => LogConfig::development(),
        };
        LogConfig {
            enabled: settings.enabled,
            ..preset.with_level(settings.level.clone())
        }
    }
}
