//! In-memory directory for tests and offline development.
//!
//! Serves a fixed set of raw station records as if they came from the live
//! API, and counts the calls it receives.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::RoundedLocation;
use crate::upstream::{self, UpstreamError};

use super::StationDirectory;
use super::types::UpstreamStation;

const SERVICE: &str = "directory";

/// Mock directory backed by a list of raw JSON records.
#[derive(Clone, Default)]
pub struct MockDirectory {
    records: Arc<Vec<Value>>,
    search_calls: Arc<AtomicUsize>,
    detail_calls: Arc<AtomicUsize>,
    failing: Arc<AtomicBool>,
}

impl MockDirectory {
    /// Create a mock that returns `records` for every search.
    pub fn new(records: Vec<Value>) -> Self {
        Self {
            records: Arc::new(records),
            ..Self::default()
        }
    }

    /// Make every subsequent call fail with a 503.
    pub fn fail(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    /// Number of `stations_near` calls received.
    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    /// Number of `station_detail` calls received.
    pub fn detail_calls(&self) -> usize {
        self.detail_calls.load(Ordering::SeqCst)
    }

    fn check_failing(&self) -> Result<(), UpstreamError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(UpstreamError::Api {
                service: SERVICE,
                status: 503,
                message: "mock directory unavailable".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl StationDirectory for MockDirectory {
    async fn stations_near(
        &self,
        _location: RoundedLocation,
    ) -> Result<Vec<UpstreamStation>, UpstreamError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failing()?;

        let body = Value::Array(self.records.as_ref().clone()).to_string();
        upstream::decode(SERVICE, &body)
    }

    async fn station_detail(&self, station_id: i64) -> Result<Option<Value>, UpstreamError> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failing()?;

        Ok(self
            .records
            .iter()
            .find(|r| r.get("ID").and_then(Value::as_i64) == Some(station_id))
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Location;
    use serde_json::json;

    fn records() -> Vec<Value> {
        vec![
            json!({ "ID": 1, "AddressInfo": { "Title": "One", "Latitude": 37.7, "Longitude": -122.4 } }),
            json!({ "ID": 2, "AddressInfo": { "Title": "Two", "Latitude": 37.8, "Longitude": -122.3 } }),
        ]
    }

    fn here() -> RoundedLocation {
        Location::new(37.75, -122.4).unwrap().rounded()
    }

    #[tokio::test]
    async fn search_returns_all_records() {
        let mock = MockDirectory::new(records());
        let stations = mock.stations_near(here()).await.unwrap();
        assert_eq!(stations.len(), 2);
        assert_eq!(mock.search_calls(), 1);
    }

    #[tokio::test]
    async fn detail_finds_by_id() {
        let mock = MockDirectory::new(records());
        let found = mock.station_detail(2).await.unwrap().unwrap();
        assert_eq!(found["AddressInfo"]["Title"], "Two");
        assert!(mock.station_detail(99).await.unwrap().is_none());
        assert_eq!(mock.detail_calls(), 2);
    }

    #[tokio::test]
    async fn failing_mock_errors() {
        let mock = MockDirectory::new(records());
        mock.fail();
        let err = mock.stations_near(here()).await.unwrap_err();
        assert!(matches!(err, UpstreamError::Api { status: 503, .. }));
    }
}
