//! Canonical station records and the per-location result cache.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::location::LocationKey;

/// One connector offered by a station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlugType {
    /// Connection type title, e.g. "J1772".
    #[serde(rename = "type")]
    pub kind: String,

    /// Upstream numeric connection type id.
    pub speed_code: i64,
}

/// A charging station in the shape this service exposes and stores.
///
/// Optional contact fields serialize as `null` rather than being omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedStation {
    /// Directory id of the station.
    pub external_id: i64,

    /// When the directory last imported this record.
    pub last_updated: Option<DateTime<Utc>>,

    pub name: String,
    pub address: String,

    /// "Town, State Postcode".
    pub city_state_zip: String,

    pub latitude: f64,
    pub longitude: f64,
    pub plug_types: Vec<PlugType>,
    pub support_number: Option<String>,
    pub support_email: Option<String>,
    pub operating_hours: Option<String>,
}

/// Cached search results for one rounded location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationResultCache {
    pub location: LocationKey,

    /// `None` until the first successful fetch.
    pub date_updated: Option<DateTime<Utc>>,

    pub response: Vec<NormalizedStation>,
}

impl StationResultCache {
    /// An empty record, as created on first lookup of a key.
    pub fn empty(location: LocationKey) -> Self {
        Self {
            location,
            date_updated: None,
            response: Vec::new(),
        }
    }

    /// Whether the record must be refetched from the directory.
    ///
    /// Stale when never updated, older than `freshness`, or empty.
    pub fn needs_refresh(&self, now: DateTime<Utc>, freshness: Duration) -> bool {
        match self.date_updated {
            None => true,
            Some(updated) => now - updated > freshness || self.response.is_empty(),
        }
    }

    /// Replace the cached results and stamp them with `now`.
    pub fn replace(&mut self, stations: Vec<NormalizedStation>, now: DateTime<Utc>) {
        self.response = stations;
        self.date_updated = Some(now);
    }
}
