//! Google Geocoding API client.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::Location;
use crate::upstream::{self, DEFAULT_TIMEOUT_SECS, UpstreamError};

use super::Geocoder;

/// Default Geocoding endpoint.
const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

const SERVICE: &str = "geocoder";

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    results: Vec<GeocodeResult>,
    status: String,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

/// Configuration for the geocoding client.
#[derive(Debug, Clone)]
pub struct GeocoderConfig {
    /// API key sent as the `key` query parameter
    pub api_key: String,
    /// Geocoding endpoint URL
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl GeocoderConfig {
    /// Create a new config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Client for the Google Geocoding API.
#[derive(Debug, Clone)]
pub struct GoogleGeocoder {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl GoogleGeocoder {
    pub fn new(config: GeocoderConfig) -> Result<Self, UpstreamError> {
        let http = upstream::http_client(SERVICE, Duration::from_secs(config.timeout_secs))?;

        Ok(Self {
            http,
            base_url: config.base_url,
            api_key: config.api_key,
        })
    }
}

#[async_trait]
impl Geocoder for GoogleGeocoder {
    async fn resolve(&self, query: &str) -> Result<Location, UpstreamError> {
        let request = self
            .http
            .get(&self.base_url)
            .query(&[("address", query), ("key", self.api_key.as_str())]);

        let response: GeocodeResponse = upstream::get_json(SERVICE, request).await?;
        first_location(response, query)
    }
}

/// Pick the best (first) match, mapping the API's in-body status.
fn first_location(response: GeocodeResponse, query: &str) -> Result<Location, UpstreamError> {
    match response.status.as_str() {
        "OK" => {}
        "ZERO_RESULTS" => {
            return Err(UpstreamError::NoMatch {
                service: SERVICE,
                query: query.to_string(),
            });
        }
        "REQUEST_DENIED" => return Err(UpstreamError::Unauthorized { service: SERVICE }),
        "OVER_QUERY_LIMIT" => return Err(UpstreamError::RateLimited { service: SERVICE }),
        other => {
            return Err(UpstreamError::Api {
                service: SERVICE,
                status: 200,
                message: response.error_message.unwrap_or_else(|| other.to_string()),
            });
        }
    }

    let result = response
        .results
        .into_iter()
        .next()
        .ok_or_else(|| UpstreamError::NoMatch {
            service: SERVICE,
            query: query.to_string(),
        })?;

    let LatLng { lat, lng } = result.geometry.location;
    Location::new(lat, lng).map_err(|e| UpstreamError::Json {
        service: SERVICE,
        message: e.to_string(),
        body: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(json: &str) -> GeocodeResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn config_builder() {
        let config = GeocoderConfig::new("k")
            .with_base_url("http://localhost:9000/geocode")
            .with_timeout(3);
        assert_eq!(config.base_url, "http://localhost:9000/geocode");
        assert_eq!(config.timeout_secs, 3);
        assert_eq!(GeocoderConfig::new("k").base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn takes_first_result() {
        let loc = first_location(
            response(
                r#"{
                    "status": "OK",
                    "results": [
                        { "geometry": { "location": { "lat": 37.7648, "lng": -122.3969 } } },
                        { "geometry": { "location": { "lat": 1.0, "lng": 1.0 } } }
                    ]
                }"#,
            ),
            "94107",
        )
        .unwrap();
        assert_eq!(loc, Location::new(37.7648, -122.3969).unwrap());
    }

    #[test]
    fn zero_results_is_no_match() {
        let err = first_location(response(r#"{"status": "ZERO_RESULTS", "results": []}"#), "00000")
            .unwrap_err();
        assert!(matches!(err, UpstreamError::NoMatch { ref query, .. } if query == "00000"));
    }

    #[test]
    fn ok_with_no_results_is_no_match() {
        let err = first_location(response(r#"{"status": "OK"}"#), "x").unwrap_err();
        assert!(matches!(err, UpstreamError::NoMatch { .. }));
    }

    #[test]
    fn denied_is_unauthorized() {
        let err = first_location(response(r#"{"status": "REQUEST_DENIED"}"#), "x").unwrap_err();
        assert!(matches!(err, UpstreamError::Unauthorized { .. }));
    }
}
