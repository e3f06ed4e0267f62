//! Server configuration.
//!
//! The mapped region is embedded from `services/region.toml`. Everything
//! that varies per deployment comes from the environment:
//!
//! | Variable | Default |
//! |---|---|
//! | `BIND_ADDR` | `127.0.0.1` |
//! | `PORT` | `8080` |
//! | `DROUGHT_MAP_OUTPUT` | `data/generated/drought_map.html` |
//!
//! The geocoder key variable is named by the geocoder's own service TOML.

use std::path::PathBuf;

use drought_map_geocoder::GeoPoint;
use drought_map_render::MapView;
use serde::Deserialize;

const REGION_TOML: &str = include_str!("../services/region.toml");

/// Default on-disk location of the rendered map.
pub const DEFAULT_OUTPUT_PATH: &str = "data/generated/drought_map.html";

/// The state whose counties are mapped.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RegionConfig {
    /// Area-of-interest code sent to the statistics service and appended
    /// to geocoding queries (e.g. `"IA"`).
    pub code: String,
    /// Display name (e.g. `"Iowa"`).
    pub name: String,
    /// Approximate geographic center of the state.
    pub center: GeoPoint,
    /// Zoom level that frames the whole state.
    pub zoom: u8,
}

impl RegionConfig {
    /// Loads the embedded region configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded TOML is malformed.
    pub fn embedded() -> Result<Self, toml::de::Error> {
        toml::de::from_str(REGION_TOML)
    }

    /// The base map view for this region.
    #[must_use]
    pub const fn view(&self) -> MapView {
        MapView {
            center: self.center,
            zoom: self.zoom,
        }
    }

    /// Map title, e.g. `"Iowa Drought Map"`.
    #[must_use]
    pub fn title(&self) -> String {
        format!("{} Drought Map", self.name)
    }
}

/// Network and storage settings read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub port: u16,
    pub output_path: PathBuf,
}

impl ServerConfig {
    /// Reads settings from the process environment, falling back to
    /// defaults for anything unset or unparseable.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = lookup("PORT").and_then(|p| p.parse().ok()).unwrap_or(8080);
        let output_path = lookup("DROUGHT_MAP_OUTPUT")
            .filter(|p| !p.trim().is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_OUTPUT_PATH), PathBuf::from);
        Self {
            bind_addr,
            port,
            output_path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn loads_embedded_region() {
        let region = RegionConfig::embedded().unwrap();
        assert_eq!(region.code, "IA");
        assert_eq!(region.zoom, 7);
        assert!((region.center.latitude - 42.032_974).abs() < 1e-9);
        assert!((region.center.longitude - -93.581_543).abs() < 1e-9);
        assert_eq!(region.title(), "Iowa Drought Map");
    }

    #[test]
    fn server_config_defaults() {
        let config = ServerConfig::from_lookup(|_| None);
        assert_eq!(config.bind_addr, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.output_path, PathBuf::from(DEFAULT_OUTPUT_PATH));
    }

    #[test]
    fn server_config_overrides() {
        let vars: BTreeMap<&str, &str> = [
            ("BIND_ADDR", "0.0.0.0"),
            ("PORT", "9000"),
            ("DROUGHT_MAP_OUTPUT", "/tmp/map.html"),
        ]
        .into_iter()
        .collect();
        let config = ServerConfig::from_lookup(|key| vars.get(key).map(ToString::to_string));
        assert_eq!(config.bind_addr, "0.0.0.0");
        assert_eq!(config.port, 9000);
        assert_eq!(config.output_path, PathBuf::from("/tmp/map.html"));
    }

    #[test]
    fn bad_port_falls_back() {
        let config =
            ServerConfig::from_lookup(|key| (key == "PORT").then(|| "not-a-port".to_string()));
        assert_eq!(config.port, 8080);
    }
}
