//! Single-station detail with nearby points of interest.

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::directory::StationDirectory;
use crate::domain::Location;
use crate::error::ServiceError;
use crate::places::{PlaceCategory, PlacesSource};
use crate::store::StationStore;
use crate::upstream::UpstreamError;

use super::config::SearchConfig;

/// Places around a station, grouped by category.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Nearby {
    pub theaters: Vec<Value>,
    pub restaurants: Vec<Value>,
    pub stores: Vec<Value>,
}

/// Station detail lookups over the directory and places API.
pub struct StationDetails<'a, S: ?Sized> {
    directory: &'a dyn StationDirectory,
    places: &'a dyn PlacesSource,
    store: &'a S,
    config: &'a SearchConfig,
}

impl<'a, S: StationStore + ?Sized> StationDetails<'a, S> {
    pub fn new(
        directory: &'a dyn StationDirectory,
        places: &'a dyn PlacesSource,
        store: &'a S,
        config: &'a SearchConfig,
    ) -> Self {
        Self {
            directory,
            places,
            store,
            config,
        }
    }

    /// The directory record for `station_id` with a `nearby` field attached.
    ///
    /// Every upstream field of the record is passed through unchanged.
    pub async fn detail(&self, station_id: i64) -> Result<Value, ServiceError> {
        self.store.ensure_station(station_id).await?;

        let mut station = self
            .directory
            .station_detail(station_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("station {station_id} not found")))?;

        let center = coordinates(&station)?;
        let nearby = self.nearby(center).await?;
        debug!(
            station_id,
            theaters = nearby.theaters.len(),
            restaurants = nearby.restaurants.len(),
            stores = nearby.stores.len(),
            "nearby places fetched"
        );

        let object = station.as_object_mut().ok_or_else(|| malformed("record is not an object"))?;
        object.insert(
            "nearby".to_string(),
            serde_json::to_value(nearby).map_err(|e| malformed(&e.to_string()))?,
        );

        Ok(station)
    }

    /// Query the three categories concurrently. Any failure fails the lot.
    async fn nearby(&self, center: Location) -> Result<Nearby, ServiceError> {
        let radius = self.config.places_radius_m;
        let (theaters, restaurants, stores) = tokio::try_join!(
            self.places.nearby(center, PlaceCategory::Theater, radius),
            self.places.nearby(center, PlaceCategory::Restaurant, radius),
            self.places.nearby(center, PlaceCategory::Store, radius),
        )?;

        Ok(Nearby {
            theaters,
            restaurants,
            stores,
        })
    }
}

/// Read `AddressInfo.Latitude/Longitude` from a raw directory record.
fn coordinates(station: &Value) -> Result<Location, ServiceError> {
    let lat = station.pointer("/AddressInfo/Latitude").and_then(Value::as_f64);
    let lng = station.pointer("/AddressInfo/Longitude").and_then(Value::as_f64);

    match (lat, lng) {
        (Some(lat), Some(lng)) => {
            Location::new(lat, lng).map_err(|e| malformed(&e.to_string()))
        }
        _ => Err(malformed("record has no coordinates")),
    }
}

fn malformed(message: &str) -> ServiceError {
    ServiceError::Upstream(UpstreamError::Json {
        service: "directory",
        message: message.to_string(),
        body: None,
    })
}
