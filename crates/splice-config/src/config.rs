use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, de};
use thiserror::Error;

use crate::capability::{CapabilityDirective, CapabilityMatrix, deduplicate_directives};
use crate::defaults::{default_caret_marker, default_log_filter, default_log_format};
use crate::logging::LogFormat;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The options could not be deserialised.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
    /// The caret marker was configured as an empty string.
    #[error("caret marker must not be empty")]
    EmptyCaretMarker,
}

/// Runtime configuration for the completion engine.
///
/// Loaded from the JSON initialisation options supplied by the client. Every
/// field is optional in the input.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct Config {
    /// `tracing` filter directive, for example `info,splice::resolve=debug`.
    pub log_filter: String,
    /// Log output format.
    #[serde(deserialize_with = "deserialize_log_format")]
    pub log_format: LogFormat,
    /// Token embedded in edit text where the caret lands after resolution.
    pub caret_marker: String,
    /// Capability overrides such as `java:completion.resolve=deny`.
    pub capability_overrides: Vec<CapabilityDirective>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter(),
            log_format: default_log_format(),
            caret_marker: default_caret_marker(),
            capability_overrides: Vec::new(),
        }
    }
}

impl Config {
    /// Loads configuration from initialisation options.
    ///
    /// `null` yields the defaults. Duplicate capability directives collapse to
    /// the last one per language and capability.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the options do not deserialise or fail
    /// validation.
    pub fn from_json(options: serde_json::Value) -> Result<Self, ConfigError> {
        if options.is_null() {
            return Ok(Self::default());
        }
        let mut config: Self = serde_json::from_value(options)?;
        config.normalise()?;
        Ok(config)
    }

    /// Loads configuration from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the document does not deserialise or fails
    /// validation.
    pub fn from_json_str(document: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_json::from_str(document)?;
        config.normalise()?;
        Ok(config)
    }

    /// Builds the override matrix consumed by the host registry.
    #[must_use]
    pub fn capability_matrix(&self) -> CapabilityMatrix {
        CapabilityMatrix::from_directives(&self.capability_overrides)
    }

    fn normalise(&mut self) -> Result<(), ConfigError> {
        if self.caret_marker.is_empty() {
            return Err(ConfigError::EmptyCaretMarker);
        }
        deduplicate_directives(&mut self.capability_overrides);
        Ok(())
    }
}

fn deserialize_log_format<'de, D>(deserializer: D) -> Result<LogFormat, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    LogFormat::from_str(raw.trim()).map_err(|_| {
        de::Error::unknown_variant(&raw, &["json", "compact"])
    })
}
