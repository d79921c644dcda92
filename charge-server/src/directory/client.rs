//! Open Charge Map HTTP client.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::RoundedLocation;
use crate::upstream::{self, DEFAULT_TIMEOUT_SECS, UpstreamError};

use super::StationDirectory;
use super::types::UpstreamStation;

/// Default base URL for the directory's POI endpoint.
const DEFAULT_BASE_URL: &str = "https://api.openchargemap.io/v3/poi/";

/// Results are restricted to this country.
const COUNTRY_CODE: &str = "US";

const SERVICE: &str = "directory";

/// Configuration for the directory client.
#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    /// API key sent as the `key` query parameter
    pub api_key: String,
    /// POI endpoint URL
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl DirectoryConfig {
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

/// Client for the Open Charge Map directory.
#[derive(Debug, Clone)]
pub struct OpenChargeMapClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenChargeMapClient {
    pub fn new(config: DirectoryConfig) -> Result<Self, UpstreamError> {
        let http = upstream::http_client(SERVICE, Duration::from_secs(config.timeout_secs))?;

        Ok(Self {
            http,
            base_url: config.base_url,
            api_key: config.api_key,
        })
    }

    fn request(&self) -> reqwest::RequestBuilder {
        self.http.get(&self.base_url).query(&[
            ("key", self.api_key.as_str()),
            ("countrycode", COUNTRY_CODE),
        ])
    }
}

#[async_trait]
impl StationDirectory for OpenChargeMapClient {
    async fn stations_near(
        &self,
        location: RoundedLocation,
    ) -> Result<Vec<UpstreamStation>, UpstreamError> {
        let request = self.request().query(&[
            ("latitude", format!("{:.1}", location.lat)),
            ("longitude", format!("{:.1}", location.lng)),
        ]);

        upstream::get_json(SERVICE, request).await
    }

    async fn station_detail(&self, station_id: i64) -> Result<Option<Value>, UpstreamError> {
        let request = self
            .request()
            .query(&[("chargepointid", station_id.to_string())]);

        let records: Vec<Value> = upstream::get_json(SERVICE, request).await?;
        Ok(records.into_iter().next())
    }
}
