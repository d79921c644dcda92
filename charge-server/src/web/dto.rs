//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{NormalizedStation, RoundedLocation};

/// Response for `POST /station/stations`.
#[derive(Debug, Serialize)]
pub struct StationsResponse {
    pub stations: Vec<NormalizedStation>,
    pub location: LocationResult,
}

/// The rounded location results are keyed by.
#[derive(Debug, Serialize)]
pub struct LocationResult {
    pub lat: f64,
    pub lng: f64,
}

impl From<RoundedLocation> for LocationResult {
    fn from(loc: RoundedLocation) -> Self {
        Self {
            lat: loc.lat,
            lng: loc.lng,
        }
    }
}

/// A station id sent either as a JSON number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum StationNumber {
    Number(i64),
    Text(String),
}

impl StationNumber {
    pub fn as_id(&self) -> String {
        match self {
            StationNumber::Number(n) => n.to_string(),
            StationNumber::Text(s) => s.trim().to_string(),
        }
    }
}

/// Request to add a favorite.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddFavoriteRequest {
    pub station_number: StationNumber,
    pub username: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub address: String,
}

/// Request to remove a favorite.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveFavoriteRequest {
    pub station_number: StationNumber,
    pub username: String,
}

/// Structured error body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error kind, e.g. "invalid_input"
    pub error: &'static str,
    pub message: String,
    /// Always false; lets favorites clients check one flag.
    pub success: bool,
}
