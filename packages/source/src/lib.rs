#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Weekly county drought statistics.
//!
//! The [`DroughtStatistics`] trait is the seam between the map pipeline and
//! the upstream data provider. [`usdm::UsdmClient`] implements it against
//! the U.S. Drought Monitor data services, querying the prior completed
//! calendar week computed by [`date_window::DateWindow`].

pub mod date_window;
pub mod parsing;
pub mod service;
pub mod usdm;

use async_trait::async_trait;
use drought_map_drought_models::CountyRecord;

pub use date_window::DateWindow;

/// Errors that can occur while fetching drought statistics.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// HTTP request failed before a response was received.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("Statistics service returned HTTP {status}")]
    Status {
        /// HTTP status code returned by the service.
        status: u16,
    },

    /// The response body did not have the expected shape.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of what went wrong.
        message: String,
    },

    /// The embedded service configuration is invalid.
    #[error("Invalid service configuration: {0}")]
    Config(#[from] toml::de::Error),
}

/// A county entry that was dropped while parsing a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    /// County name, if the entry had one.
    pub county: Option<String>,
    /// Why the entry was dropped.
    pub reason: String,
}

/// Result of one statistics fetch.
#[derive(Debug, Clone, Default)]
pub struct CountyBatch {
    /// Successfully parsed county records, in response order.
    pub records: Vec<CountyRecord>,
    /// Entries that could not be parsed.
    pub skipped: Vec<SkippedRecord>,
}

/// A provider of weekly county drought statistics.
#[async_trait]
pub trait DroughtStatistics: Send + Sync {
    /// Fetches per-county statistics for `region` (a state abbreviation such
    /// as `"IA"`) over `window`.
    ///
    /// Individual malformed entries are reported in
    /// [`CountyBatch::skipped`] rather than failing the whole fetch.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the request fails, the service responds
    /// with a non-200 status, or the body is not a JSON array.
    async fn fetch(&self, region: &str, window: &DateWindow) -> Result<CountyBatch, SourceError>;
}
