#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web server for the county drought map.
//!
//! `GET /` fetches last week's county drought statistics, classifies and
//! geocodes every county, renders a `Leaflet` map, and returns a landing
//! page that embeds it. `GET /map` serves the most recent render.

pub mod cache;
pub mod config;
mod handlers;
pub mod pages;
pub mod pipeline;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use chrono::{DateTime, Local};
use drought_map_geocoder::{GeoLookup, google::GoogleGeocoder, service_registry::GeocodingService};
use drought_map_source::{DroughtStatistics, usdm::UsdmClient};

use crate::{
    cache::RenderCache,
    config::{RegionConfig, ServerConfig},
};

/// Shared application state.
pub struct AppState {
    /// Upstream drought statistics.
    pub statistics: Arc<dyn DroughtStatistics>,
    /// County geocoder.
    pub geocoder: Arc<dyn GeoLookup>,
    /// The mapped region.
    pub region: RegionConfig,
    /// Latest rendered map.
    pub cache: RenderCache,
    /// Where each new map is also written on disk, if anywhere.
    pub output_path: Option<PathBuf>,
    /// Source of "now" for date windows and render timestamps.
    pub clock: fn() -> DateTime<Local>,
}

/// Registers the two routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/").route(web::get().to(handlers::index)))
        .service(web::resource("/map").route(web::get().to(handlers::map)));
}

/// Starts the drought map server.
///
/// Reads [`ServerConfig`] from the environment, builds the statistics and
/// geocoding clients, and serves until shut down. The caller provides the
/// async runtime (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if configuration or client setup
/// fails, or the HTTP server fails to bind or run.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let config = ServerConfig::from_env();
    let region = RegionConfig::embedded().map_err(io::Error::other)?;

    let geocoding = GeocodingService::google().map_err(io::Error::other)?;
    let api_key = geocoding.api_key_from_env().unwrap_or_else(|| {
        log::warn!(
            "{} is not set; every county will fail to geocode",
            geocoding.api_key_env
        );
        String::new()
    });
    let geocoder = GoogleGeocoder::new(&geocoding, api_key).map_err(io::Error::other)?;
    let statistics = UsdmClient::new().map_err(io::Error::other)?;

    let state = web::Data::new(AppState {
        statistics: Arc::new(statistics),
        geocoder: Arc::new(geocoder),
        region,
        cache: RenderCache::new(),
        output_path: Some(config.output_path.clone()),
        clock: Local::now,
    });

    log::info!(
        "Mapping {} ({}); writing maps to {}",
        state.region.name,
        state.region.code,
        config.output_path.display()
    );
    log::info!("Starting server on {}:{}", config.bind_addr, config.port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((config.bind_addr.as_str(), config.port))?
    .run()
    .await
}
