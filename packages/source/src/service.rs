//! Compile-time configuration of the statistics service.
//!
//! The endpoint and its fixed selectors live in `services/usdm.toml`, which
//! is embedded at compile time.

use serde::Deserialize;

use crate::SourceError;

const USDM_TOML: &str = include_str!("../services/usdm.toml");

/// Statistics service configuration loaded from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct StatisticsService {
    /// Unique identifier (e.g., `"usdm"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// API base URL without a trailing slash.
    pub base_url: String,
    /// Statistics area path segment (e.g., `"CountyStatistics"`).
    pub area: String,
    /// Statistics method path segment.
    pub statistics_method: String,
    /// Value sent as `statisticsType`.
    pub statistics_type: u8,
    /// `chrono` format for `startdate` / `enddate`.
    pub date_format: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

const fn default_timeout_secs() -> u64 {
    30
}

impl StatisticsService {
    /// Returns the embedded U.S. Drought Monitor configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Config`] if the embedded TOML is malformed.
    pub fn usdm() -> Result<Self, SourceError> {
        Ok(toml::de::from_str(USDM_TOML)?)
    }

    /// Full endpoint URL, without query parameters.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!(
            "{}/{}/{}",
            self.base_url.trim_end_matches('/'),
            self.area,
            self.statistics_method
        )
    }
}
