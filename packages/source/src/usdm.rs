//! U.S. Drought Monitor data services client.
//!
//! Queries county drought severity statistics for one state over one week.
//!
//! See <https://droughtmonitor.unl.edu/DmData/DataDownload/WebServiceInfo.aspx>

use std::time::Duration;

use async_trait::async_trait;

use crate::{
    CountyBatch, DateWindow, DroughtStatistics, SourceError, parsing::parse_county,
    service::StatisticsService,
};

/// Statistics client for the U.S. Drought Monitor.
#[derive(Debug, Clone)]
pub struct UsdmClient {
    client: reqwest::Client,
    service: StatisticsService,
}

impl UsdmClient {
    /// Creates a client from the embedded service configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the configuration is invalid or the HTTP
    /// client cannot be built.
    pub fn new() -> Result<Self, SourceError> {
        Self::with_service(StatisticsService::usdm()?)
    }

    /// Creates a client for an explicit service configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the HTTP client cannot be built.
    pub fn with_service(service: StatisticsService) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(service.timeout_secs))
            .build()?;
        Ok(Self { client, service })
    }

    /// Returns the query parameters for `region` over `window`.
    #[must_use]
    pub fn query_params(&self, region: &str, window: &DateWindow) -> Vec<(&'static str, String)> {
        let (start, end) = window.format(&self.service.date_format);
        vec![
            ("aoi", region.to_string()),
            ("startdate", start),
            ("enddate", end),
            ("statisticsType", self.service.statistics_type.to_string()),
        ]
    }
}

#[async_trait]
impl DroughtStatistics for UsdmClient {
    async fn fetch(&self, region: &str, window: &DateWindow) -> Result<CountyBatch, SourceError> {
        let url = self.service.endpoint();
        let params = self.query_params(region, window);
        log::debug!("{}: GET {url} {params:?}", self.service.name);

        let resp = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .query(&params)
            .send()
            .await?;

        let status = resp.status();
        if status != reqwest::StatusCode::OK {
            log::warn!("{}: HTTP {status} for {region} ({window})", self.service.name);
            return Err(SourceError::Status {
                status: status.as_u16(),
            });
        }

        let body: serde_json::Value = resp.json().await?;
        parse_response(&body)
    }
}

/// Parses a statistics response body into county records.
///
/// # Errors
///
/// Returns [`SourceError::Parse`] if the body is not a JSON array.
pub fn parse_response(body: &serde_json::Value) -> Result<CountyBatch, SourceError> {
    let entries = body.as_array().ok_or_else(|| SourceError::Parse {
        message: "Statistics response is not an array".to_string(),
    })?;

    let mut batch = CountyBatch::default();
    for entry in entries {
        match parse_county(entry) {
            Ok(record) => batch.records.push(record),
            Err(skipped) => {
                log::warn!(
                    "Skipping county {}: {}",
                    skipped.county.as_deref().unwrap_or("<unnamed>"),
                    skipped.reason
                );
                batch.skipped.push(skipped);
            }
        }
    }

    Ok(batch)
}
