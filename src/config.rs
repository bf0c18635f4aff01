//! Agent configuration parameters
//!
//! Startup-time choices for the agent.  Loaded from a JSON file when one is
//! given on the command line; every field falls back to its default.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::twin::encoder::Dialect;

/// Core agent configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    // --- Twin ---
    /// Wire shape of reported-property acknowledgements
    pub dialect: Dialect,

    // --- Timing ---
    /// Sensor poll period (seconds); changed at runtime by `setSensorPollTime`
    pub sensor_poll_secs: u32,
    /// Button poll period (milliseconds)
    pub button_poll_ms: u32,

    // --- Identity ---
    /// Reported once as `versionString` after the first connection
    pub version_string: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            dialect: Dialect::Plain,
            sensor_poll_secs: 1,
            button_poll_ms: 1,
            version_string: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl AgentConfig {
    /// Parse and validate a JSON configuration document.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text).map_err(|_| ConfigError::Corrupted)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject out-of-range values instead of clamping them.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sensor_poll_secs < 1 {
            return Err(ConfigError::ValidationFailed("sensor_poll_secs must be >= 1"));
        }
        if self.button_poll_ms < 1 {
            return Err(ConfigError::ValidationFailed("button_poll_ms must be >= 1"));
        }
        if self.version_string.is_empty() {
            return Err(ConfigError::ValidationFailed("version_string must not be empty"));
        }
        Ok(())
    }
}

/// Errors from loading an [`AgentConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The config file could not be read.
    NotFound,
    /// The config text failed deserialization.
    Corrupted,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}
