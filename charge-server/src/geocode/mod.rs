//! Resolve free-form locations ("94107", "Oakland, CA") to coordinates.

mod cache;
mod client;
mod mock;

use async_trait::async_trait;

use crate::domain::Location;
use crate::upstream::UpstreamError;

pub use cache::{CachedGeocoder, GeocodeCacheConfig};
pub use client::{GeocoderConfig, GoogleGeocoder};
pub use mock::MockGeocoder;

/// Resolves a postal code or "city, state" string to a location.
///
/// No retry: a failure is returned to the caller as-is.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn resolve(&self, query: &str) -> Result<Location, UpstreamError>;
}
