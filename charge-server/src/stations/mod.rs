//! Station search, detail and nearby-places lookups.
//!
//! Search resolves a location, consults the location-keyed result cache and
//! refreshes it from the directory when stale. Detail fetches one station
//! from the directory and attaches nearby theaters, restaurants and stores.

mod config;
mod detail;
mod search;

pub use config::{DEFAULT_FRESHNESS_MS, DEFAULT_PLACES_RADIUS_M, SearchConfig};
pub use detail::{Nearby, StationDetails};
pub use search::{SearchQuery, SearchResult, StationSearch};
