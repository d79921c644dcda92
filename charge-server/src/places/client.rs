//! Google Places Nearby Search client.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::domain::Location;
use crate::upstream::{self, DEFAULT_TIMEOUT_SECS, UpstreamError};

use super::{PlaceCategory, PlacesSource};

/// Default Nearby Search endpoint.
const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/place/nearbysearch/json";

const SERVICE: &str = "places";

/// Nearby Search response. Only `results` is passed on.
#[derive(Debug, Deserialize)]
struct NearbyResponse {
    #[serde(default)]
    results: Vec<Value>,
    status: Option<String>,
    error_message: Option<String>,
}

/// Configuration for the places client.
#[derive(Debug, Clone)]
pub struct PlacesConfig {
    /// API key sent as the `key` query parameter
    pub api_key: String,
    /// Nearby Search endpoint URL
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl PlacesConfig {
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

/// Client for the Google Places API.
#[derive(Debug, Clone)]
pub struct GooglePlacesClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl GooglePlacesClient {
    pub fn new(config: PlacesConfig) -> Result<Self, UpstreamError> {
        let http = upstream::http_client(SERVICE, Duration::from_secs(config.timeout_secs))?;

        Ok(Self {
            http,
            base_url: config.base_url,
            api_key: config.api_key,
        })
    }

    fn request(
        &self,
        center: Location,
        category: PlaceCategory,
        radius_m: u32,
    ) -> reqwest::RequestBuilder {
        self.http.get(&self.base_url).query(&[
            ("location", format!("{},{}", center.lat, center.lng)),
            ("radius", radius_m.to_string()),
            ("type", category.api_type().to_string()),
            ("key", self.api_key.clone()),
        ])
    }
}

#[async_trait]
impl PlacesSource for GooglePlacesClient {
    async fn nearby(
        &self,
        center: Location,
        category: PlaceCategory,
        radius_m: u32,
    ) -> Result<Vec<Value>, UpstreamError> {
        let response: NearbyResponse =
            upstream::get_json(SERVICE, self.request(center, category, radius_m)).await?;
        check_status(response)
    }
}

/// Places reports errors inside a 200 body via `status`.
fn check_status(response: NearbyResponse) -> Result<Vec<Value>, UpstreamError> {
    match response.status.as_deref() {
        None | Some("OK") | Some("ZERO_RESULTS") => Ok(response.results),
        Some("REQUEST_DENIED") => Err(UpstreamError::Unauthorized { service: SERVICE }),
        Some("OVER_QUERY_LIMIT") => Err(UpstreamError::RateLimited { service: SERVICE }),
        Some(other) => Err(UpstreamError::Api {
            service: SERVICE,
            status: 200,
            message: response
                .error_message
                .unwrap_or_else(|| other.to_string()),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(json: &str) -> NearbyResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn config_defaults() {
        let config = PlacesConfig::new("k");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn request_has_location_radius_and_type() {
        let client = GooglePlacesClient::new(PlacesConfig::new("k")).unwrap();
        let center = Location::new(37.5, -122.25).unwrap();
        let request = client
            .request(center, PlaceCategory::Theater, 1500)
            .build()
            .unwrap();
        let query = request.url().query().unwrap();
        assert!(query.contains("location=37.5%2C-122.25"));
        assert!(query.contains("radius=1500"));
        assert!(query.contains("type=movie_theater"));
    }

    #[test]
    fn zero_results_is_empty_ok() {
        let results = check_status(response(r#"{"results": [], "status": "ZERO_RESULTS"}"#));
        assert!(results.unwrap().is_empty());
    }

    #[test]
    fn denied_is_unauthorized() {
        let err = check_status(response(
            r#"{"results": [], "status": "REQUEST_DENIED", "error_message": "bad key"}"#,
        ))
        .unwrap_err();
        assert!(matches!(err, UpstreamError::Unauthorized { .. }));
    }

    #[test]
    fn invalid_request_carries_message() {
        let err = check_status(response(
            r#"{"status": "INVALID_REQUEST", "error_message": "missing location"}"#,
        ))
        .unwrap_err();
        assert_eq!(err.to_string(), "places error 200: missing location");
    }
}
