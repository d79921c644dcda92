//! Nearby points of interest (Google Places Nearby Search).

mod client;
mod mock;

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::Location;
use crate::upstream::UpstreamError;

pub use client::{GooglePlacesClient, PlacesConfig};
pub use mock::MockPlaces;

/// The place categories attached to a station's detail view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaceCategory {
    Theater,
    Restaurant,
    Store,
}

impl PlaceCategory {
    pub const ALL: [PlaceCategory; 3] = [
        PlaceCategory::Theater,
        PlaceCategory::Restaurant,
        PlaceCategory::Store,
    ];

    /// The Places API `type` filter for this category.
    pub fn api_type(self) -> &'static str {
        match self {
            PlaceCategory::Theater => "movie_theater",
            PlaceCategory::Restaurant => "restaurant",
            PlaceCategory::Store => "store",
        }
    }
}

/// A source of nearby places.
#[async_trait]
pub trait PlacesSource: Send + Sync {
    /// Raw place results of `category` within `radius_m` metres of `center`.
    async fn nearby(
        &self,
        center: Location,
        category: PlaceCategory,
        radius_m: u32,
    ) -> Result<Vec<Value>, UpstreamError>;
}
