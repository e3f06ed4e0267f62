//! Compile-time geocoding service configuration.
//!
//! The provider is defined in `services/google.toml` and embedded at
//! compile time. The API key is never stored there: the TOML names the
//! environment variable that holds it.

use serde::Deserialize;

use crate::GeocodeError;

/// A geocoding service configuration loaded from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodingService {
    /// Unique identifier (e.g., `"google"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// API endpoint URL.
    pub base_url: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

const fn default_timeout_secs() -> u64 {
    10
}

const GOOGLE_TOML: &str = include_str!("../services/google.toml");

impl GeocodingService {
    /// Returns the embedded Google Geocoding configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Config`] if the embedded TOML is malformed.
    pub fn google() -> Result<Self, GeocodeError> {
        Ok(toml::de::from_str(GOOGLE_TOML)?)
    }

    /// Resolves the API key from the configured environment variable.
    ///
    /// Returns `None` if the variable is unset or blank.
    #[must_use]
    pub fn api_key_from_env(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
    }
}
