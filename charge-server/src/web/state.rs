//! Application state for the web layer.

use std::sync::Arc;

use crate::directory::StationDirectory;
use crate::geocode::Geocoder;
use crate::places::PlacesSource;
use crate::stations::SearchConfig;
use crate::store::Store;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Location resolver for zip / city-state searches
    pub geocoder: Arc<dyn Geocoder>,

    /// Charging-station directory
    pub directory: Arc<dyn StationDirectory>,

    /// Nearby points of interest
    pub places: Arc<dyn PlacesSource>,

    /// Document store
    pub store: Arc<dyn Store>,

    /// Search and detail tunables
    pub config: Arc<SearchConfig>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(
        geocoder: Arc<dyn Geocoder>,
        directory: Arc<dyn StationDirectory>,
        places: Arc<dyn PlacesSource>,
        store: Arc<dyn Store>,
        config: SearchConfig,
    ) -> Self {
        Self {
            geocoder,
            directory,
            places,
            store,
            config: Arc::new(config),
        }
    }
}
