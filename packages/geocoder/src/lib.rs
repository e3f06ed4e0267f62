#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Geocoding for county markers.
//!
//! Resolves a county name within a state to a single latitude/longitude
//! pair. The [`GeoLookup`] trait is the seam used by the map pipeline;
//! [`google::GoogleGeocoder`] implements it against the Google Geocoding
//! API configured in `services/google.toml`.
//!
//! Lookups are one request per place with no caching, retry, or rate
//! limiting. Any failure is reported to the caller as "not found" by
//! [`GeoLookup::lookup`], after being logged.

pub mod google;
pub mod service_registry;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A resolved WGS84 coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude.
    pub latitude: f64,
    /// Longitude.
    pub longitude: f64,
}

impl GeoPoint {
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Errors from geocoding operations.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-200 status.
    #[error("Geocoder returned HTTP {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// The service rejected the request (bad key, quota, etc.).
    #[error("Geocoder rejected request ({status}): {message}")]
    Rejected {
        /// Service-level status string (e.g. `REQUEST_DENIED`).
        status: String,
        /// Message supplied by the service, if any.
        message: String,
    },

    /// Response parsing failed.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the parsing failure.
        message: String,
    },

    /// The embedded service configuration is invalid.
    #[error("Invalid service configuration: {0}")]
    Config(#[from] toml::de::Error),
}

/// Resolves place names to coordinates.
#[async_trait]
pub trait GeoLookup: Send + Sync {
    /// Geocodes `place` within `region` (e.g. `"Polk"`, `"IA"`).
    ///
    /// Returns `Ok(None)` when the service answered but had no result.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError`] if the request or response parsing fails.
    async fn geocode(&self, place: &str, region: &str) -> Result<Option<GeoPoint>, GeocodeError>;

    /// Geocodes `place`, folding every failure into `None`.
    ///
    /// Misses and errors are logged as warnings so dropped counties remain
    /// observable.
    async fn lookup(&self, place: &str, region: &str) -> Option<GeoPoint> {
        match self.geocode(place, region).await {
            Ok(Some(point)) => Some(point),
            Ok(None) => {
                log::warn!("No geocoding result for {place}, {region}");
                None
            }
            Err(e) => {
                log::warn!("Geocoding {place}, {region} failed: {e}");
                None
            }
        }
    }
}
