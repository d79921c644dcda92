//! Charging-station directory (Open Charge Map).
//!
//! Provides geographic station search and single-station detail lookups,
//! plus the normalizer that turns directory records into
//! [`NormalizedStation`](crate::domain::NormalizedStation).

mod client;
mod mock;
mod normalize;
mod types;

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::RoundedLocation;
use crate::upstream::UpstreamError;

pub use client::{DirectoryConfig, OpenChargeMapClient};
pub use mock::MockDirectory;
pub use normalize::normalize_station;
pub use types::{
    AddressInfo, Connection, ConnectionType, DataProvider, OperatorInfo, UpstreamStation,
};

/// A source of charging-station records.
#[async_trait]
pub trait StationDirectory: Send + Sync {
    /// Stations around a rounded location.
    async fn stations_near(
        &self,
        location: RoundedLocation,
    ) -> Result<Vec<UpstreamStation>, UpstreamError>;

    /// The raw directory record for one station, or `None` if the id is unknown.
    async fn station_detail(&self, station_id: i64) -> Result<Option<Value>, UpstreamError>;
}
