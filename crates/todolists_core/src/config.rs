//! Store configuration.
//!
//! # Responsibility
//! - Carry the storage key, dismissal delay and locale used by the stores.
//! - Parse host-provided JSON configuration with per-field defaults.
//!
//! # Invariants
//! - `storage_key` is non-blank and `dismiss_after_ms` is positive after
//!   `validate()` succeeds.

use crate::i18n::Locale;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage key holding the serialized list collection.
pub const DEFAULT_STORAGE_KEY: &str = "lists";
/// Lifetime of a removal notification before it auto-dismisses.
pub const DEFAULT_DISMISS_AFTER_MS: u64 = 8_000;

/// Errors from loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    Parse(serde_json::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "failed to parse store config: {err}"),
            Self::Invalid(message) => write!(f, "invalid store config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

/// Runtime settings shared by the lists and notification stores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub storage_key: String,
    pub dismiss_after_ms: u64,
    pub locale: Locale,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            dismiss_after_ms: DEFAULT_DISMISS_AFTER_MS,
            locale: Locale::default(),
        }
    }
}

impl StoreConfig {
    /// Parses JSON config; missing fields take their defaults.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_json::from_str(raw).map_err(ConfigError::Parse)?;
        config.storage_key = config.storage_key.trim().to_string();
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "storage_key must not be blank".to_string(),
            ));
        }
        if self.dismiss_after_ms == 0 {
            return Err(ConfigError::Invalid(
                "dismiss_after_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
