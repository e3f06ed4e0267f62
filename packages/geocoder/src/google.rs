//! Google Geocoding API client.
//!
//! A lookup succeeds only when the service answers HTTP 200 with at least
//! one result; the first result's `geometry.location` is used.
//!
//! See <https://developers.google.com/maps/documentation/geocoding/requests-geocoding>

use std::time::Duration;

use async_trait::async_trait;

use crate::{GeoLookup, GeoPoint, GeocodeError, service_registry::GeocodingService};

/// Google Geocoding API client.
#[derive(Debug, Clone)]
pub struct GoogleGeocoder {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl GoogleGeocoder {
    /// Creates a client for `service` using `api_key`.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the HTTP client cannot be built.
    pub fn new(
        service: &GeocodingService,
        api_key: impl Into<String>,
    ) -> Result<Self, GeocodeError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(service.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: service.base_url.clone(),
            api_key: api_key.into(),
        })
    }
}

/// Builds the free-form address sent to the service.
#[must_use]
pub fn address_for(place: &str, region: &str) -> String {
    format!("{place},{region}")
}

#[async_trait]
impl GeoLookup for GoogleGeocoder {
    async fn geocode(&self, place: &str, region: &str) -> Result<Option<GeoPoint>, GeocodeError> {
        let address = address_for(place, region);
        log::debug!("Geocoding \"{address}\"");

        let resp = self
            .client
            .get(&self.base_url)
            .query(&[
                ("address", address.as_str()),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = resp.status();
        if status != reqwest::StatusCode::OK {
            return Err(GeocodeError::Status {
                status: status.as_u16(),
            });
        }

        let body: serde_json::Value = resp.json().await?;
        parse_response(&body)
    }
}

/// Parses a Geocoding API response body.
fn parse_response(body: &serde_json::Value) -> Result<Option<GeoPoint>, GeocodeError> {
    let results = body["results"]
        .as_array()
        .ok_or_else(|| GeocodeError::Parse {
            message: "Geocoding response has no results array".to_string(),
        })?;

    let Some(first) = results.first() else {
        // Google reports failures like REQUEST_DENIED with an empty result
        // list and a status string.
        return match body["status"].as_str() {
            None | Some("OK" | "ZERO_RESULTS") => Ok(None),
            Some(status) => Err(GeocodeError::Rejected {
                status: status.to_string(),
                message: body["error_message"]
                    .as_str()
                    .unwrap_or_default()
                    .to_string(),
            }),
        };
    };

    let location = &first["geometry"]["location"];

    let lat = location["lat"]
        .as_f64()
        .ok_or_else(|| GeocodeError::Parse {
            message: "Missing lat in geocoding response".to_string(),
        })?;

    let lng = location["lng"]
        .as_f64()
        .ok_or_else(|| GeocodeError::Parse {
            message: "Missing lng in geocoding response".to_string(),
        })?;

    Ok(Some(GeoPoint::new(lat, lng)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const GEOCODE_PATH: &str = "/maps/api/geocode/json";

    fn geocoder_for(server: &MockServer) -> GoogleGeocoder {
        let service = GeocodingService {
            base_url: format!("{}{GEOCODE_PATH}", server.uri()),
            ..GeocodingService::google().unwrap()
        };
        GoogleGeocoder::new(&service, "test-key").unwrap()
    }

    #[test]
    fn parses_first_result() {
        let body = serde_json::json!({
            "results": [
                {
                    "formatted_address": "Polk County, IA, USA",
                    "geometry": { "location": { "lat": 41.6, "lng": -93.6 } }
                },
                {
                    "geometry": { "location": { "lat": 1.0, "lng": 2.0 } }
                }
            ],
            "status": "OK"
        });
        let point = parse_response(&body).unwrap().unwrap();
        assert!((point.latitude - 41.6).abs() < 1e-9);
        assert!((point.longitude - -93.6).abs() < 1e-9);
    }

    #[test]
    fn zero_results_is_none() {
        let body = serde_json::json!({ "results": [], "status": "ZERO_RESULTS" });
        assert!(parse_response(&body).unwrap().is_none());
    }

    #[test]
    fn request_denied_is_error() {
        let body = serde_json::json!({
            "results": [],
            "status": "REQUEST_DENIED",
            "error_message": "The provided API key is invalid."
        });
        let err = parse_response(&body).unwrap_err();
        assert!(matches!(
            err,
            GeocodeError::Rejected { ref status, .. } if status == "REQUEST_DENIED"
        ));
    }

    #[test]
    fn missing_location_is_parse_error() {
        let body = serde_json::json!({ "results": [{ "geometry": {} }], "status": "OK" });
        assert!(matches!(
            parse_response(&body).unwrap_err(),
            GeocodeError::Parse { .. }
        ));
    }

    #[test]
    fn address_joins_place_and_region() {
        assert_eq!(address_for("Polk", "IA"), "Polk,IA");
    }

    #[tokio::test]
    async fn geocode_sends_address_and_key() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(GEOCODE_PATH))
            .and(query_param("address", "Polk,IA"))
            .and(query_param("key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "results": [
                    { "geometry": { "location": { "lat": 41.6, "lng": -93.6 } } }
                ],
                "status": "OK"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let point = geocoder_for(&mock_server)
            .geocode("Polk", "IA")
            .await
            .unwrap();
        assert_eq!(point, Some(GeoPoint::new(41.6, -93.6)));
    }

    #[tokio::test]
    async fn empty_results_is_not_found() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(GEOCODE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "results": [],
                "status": "ZERO_RESULTS"
            })))
            .mount(&mock_server)
            .await;

        let geocoder = geocoder_for(&mock_server);
        assert_eq!(geocoder.geocode("Nowhere", "IA").await.unwrap(), None);
        assert_eq!(geocoder.lookup("Nowhere", "IA").await, None);
    }

    #[tokio::test]
    async fn non_success_status_is_not_found() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(GEOCODE_PATH))
            .respond_with(ResponseTemplate::new(403))
            .mount(&mock_server)
            .await;

        let geocoder = geocoder_for(&mock_server);
        assert!(matches!(
            geocoder.geocode("Polk", "IA").await,
            Err(GeocodeError::Status { status: 403 })
        ));
        assert_eq!(geocoder.lookup("Polk", "IA").await, None);
    }
}
