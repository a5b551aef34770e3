//! Layered settings loader.

use std::env;
use std::fs;
use std::path::Path;

use super::{KanonSettings, LogFormat};
use crate::SettingsError;

/// Loads [`KanonSettings`] in layers, later layers overriding earlier ones:
///
/// 1. Built-in defaults
/// 2. A settings file or string (TOML or JSON)
/// 3. Environment variables, when a prefix is set
///
/// # Example
///
/// ```no_run
/// use kanon::SettingsLoader;
///
/// # fn main() -> Result<(), kanon::SettingsError> {
/// let settings = SettingsLoader::new()
///     .with_optional_file("kanon.toml")?
///     .with_env_prefix("KANON")
///     .load()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct SettingsLoader {
    settings: KanonSettings,
    env_prefix: Option<String>,
}

impl SettingsLoader {
    /// Create a loader starting from the defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from a file. The format follows the extension.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if the file is missing, unreadable, not
    /// TOML/JSON, malformed, or contains unknown fields.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(SettingsError::file_not_found(path));
        }

        let content = fs::read_to_string(path).map_err(|e| SettingsError::read_error(path, e))?;
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();

        self.settings = parse(&content, extension)?;
        Ok(self)
    }

    /// Like [`with_file`](Self::with_file), but a missing file is skipped.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if the file exists but cannot be loaded.
    pub fn with_optional_file<P: AsRef<Path>>(self, path: P) -> Result<Self, SettingsError> {
        if path.as_ref().exists() {
            self.with_file(path)
        } else {
            Ok(self)
        }
    }

    /// Load settings from a string in `format` (`"toml"` or `"json"`).
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if the format is unknown or parsing fails.
    ///
    /// # Example
    ///
    /// ```
    /// use kanon::SettingsLoader;
    ///
    /// let settings = SettingsLoader::new()
    ///     .with_string("[validation]\nparallelism = 4", "toml")
    ///     .unwrap()
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(settings.validation.parallelism, 4);
    /// ```
    pub fn with_string(mut self, content: &str, format: &str) -> Result<Self, SettingsError> {
        self.settings = parse(content, format)?;
        Ok(self)
    }

    /// Apply `PREFIX__SECTION__KEY` environment overrides on load.
    ///
    /// Recognised variables, for prefix `KANON`:
    /// - `KANON__VALIDATION__STRICT`
    /// - `KANON__VALIDATION__PARALLELISM`
    /// - `KANON__VALIDATION__PROFILE` (empty clears it)
    /// - `KANON__LOGGING__ENABLED`
    /// - `KANON__LOGGING__LEVEL`
    /// - `KANON__LOGGING__FORMAT`
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_uppercase());
        self
    }

    /// Load variables from a `.env` file in the working directory, if any.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Dotenv`] if a `.env` file exists but cannot
    /// be parsed.
    pub fn with_dotenv(self) -> Result<Self, SettingsError> {
        match dotenvy::dotenv() {
            Ok(_) => Ok(self),
            Err(e) if e.not_found() => Ok(self),
            Err(e) => Err(SettingsError::Dotenv(e.to_string())),
        }
    }

    /// Apply environment overrides and validate.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if an override cannot be parsed or the
    /// result fails [`KanonSettings::validate`].
    pub fn load(mut self) -> Result<KanonSettings, SettingsError> {
        if let Some(prefix) = self.env_prefix.take() {
            self.apply_env_overrides(&prefix)?;
        }

        self.settings.validate()?;
        Ok(self.settings)
    }

    /// Return the settings as loaded so far, without environment overrides
    /// or validation.
    #[must_use]
    pub fn load_unvalidated(self) -> KanonSettings {
        self.settings
    }

    fn apply_env_overrides(&mut self, prefix: &str) -> Result<(), SettingsError> {
        let mut vars: Vec<(String, String)> = env::vars()
            .filter(|(k, _)| k.starts_with(prefix))
            .collect();
        vars.sort();

        for (key, value) in vars {
            self.apply_env_var(&key, &value, prefix)?;
        }

        Ok(())
    }

    fn apply_env_var(&mut self, key: &str, value: &str, prefix: &str) -> Result<(), SettingsError> {
        let Some(rest) = key.strip_prefix(prefix).and_then(|k| k.strip_prefix("__")) else {
            // `KANONX_...` shares the prefix but is not ours.
            return Ok(());
        };

        let parts: Vec<&str> = rest.split("__").collect();

        match parts.as_slice() {
            ["VALIDATION", "STRICT"] => {
                self.settings.validation.strict = parse_bool(value)
                    .ok_or_else(|| SettingsError::env_parse_error(key, "expected boolean"))?;
            }
            ["VALIDATION", "PARALLELISM"] => {
                self.settings.validation.parallelism = value
                    .parse()
                    .map_err(|_| SettingsError::env_parse_error(key, "expected integer"))?;
            }
            ["VALIDATION", "PROFILE"] => {
                self.settings.validation.profile = if value.is_empty() {
                    None
                } else {
                    Some(value.to_string())
                };
            }
            ["LOGGING", "ENABLED"] => {
                self.settings.logging.enabled = parse_bool(value)
                    .ok_or_else(|| SettingsError::env_parse_error(key, "expected boolean"))?;
            }
            ["LOGGING", "LEVEL"] => {
                self.settings.logging.level = value.to_string();
            }
            ["LOGGING", "FORMAT"] => {
                self.settings.logging.format = match value.to_lowercase().as_str() {
                    "json" => LogFormat::Json,
                    "pretty" => LogFormat::Pretty,
                    _ => {
                        return Err(SettingsError::env_parse_error(
                            key,
                            "expected 'json' or 'pretty'",
                        ))
                    }
                };
            }
            _ => {
                return Err(SettingsError::env_parse_error(key, "unknown setting"));
            }
        }

        Ok(())
    }
}

fn parse(content: &str, format: &str) -> Result<KanonSettings, SettingsError> {
    match format.to_lowercase().as_str() {
        "toml" => Ok(toml::from_str(content)?),
        "json" => Ok(serde_json::from_str(content)?),
        other => Err(SettingsError::unsupported_format(other)),
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
