//! Caching layer for geocoding lookups.
//!
//! Postal codes and city names resolve to the same coordinates for a long
//! time, so successful lookups are kept in memory. Failures are not cached.

use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache as MokaCache;
use tracing::debug;

use crate::domain::Location;
use crate::upstream::UpstreamError;

use super::Geocoder;

/// Configuration for the geocode cache.
#[derive(Debug, Clone)]
pub struct GeocodeCacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for GeocodeCacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(24 * 60 * 60),
            max_capacity: 10_000,
        }
    }
}

/// Geocoder with an in-memory cache in front of it.
pub struct CachedGeocoder<G> {
    inner: G,
    cache: MokaCache<String, Location>,
}

impl<G: Geocoder> CachedGeocoder<G> {
    pub fn new(inner: G, config: &GeocodeCacheConfig) -> Self {
        let cache = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { inner, cache }
    }

    /// Access the wrapped geocoder.
    pub fn inner(&self) -> &G {
        &self.inner
    }

    /// Get cache statistics.
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }
}

/// "  Oakland, CA " and "oakland, ca" are the same query.
fn cache_key(query: &str) -> String {
    query.trim().to_lowercase()
}

#[async_trait]
impl<G: Geocoder> Geocoder for CachedGeocoder<G> {
    async fn resolve(&self, query: &str) -> Result<Location, UpstreamError> {
        let key = cache_key(query);

        if let Some(location) = self.cache.get(&key).await {
            debug!(query = %key, "geocode cache hit");
            return Ok(location);
        }

        let location = self.inner.resolve(query.trim()).await?;
        self.cache.insert(key, location).await;

        Ok(location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocode::MockGeocoder;

    fn mock() -> MockGeocoder {
        MockGeocoder::new([
            ("94107", Location::new(37.7648, -122.3969).unwrap()),
            ("oakland, ca", Location::new(37.8044, -122.2712).unwrap()),
        ])
    }

    #[test]
    fn default_config() {
        let config = GeocodeCacheConfig::default();
        assert_eq!(config.ttl, Duration::from_secs(86_400));
        assert_eq!(config.max_capacity, 10_000);
    }

    #[test]
    fn key_is_trimmed_and_lowercased() {
        assert_eq!(cache_key("  Oakland, CA "), "oakland, ca");
    }

    #[tokio::test]
    async fn second_lookup_is_served_from_cache() {
        let cached = CachedGeocoder::new(mock(), &GeocodeCacheConfig::default());

        let first = cached.resolve("94107").await.unwrap();
        let second = cached.resolve(" 94107 ").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(cached.inner().calls(), 1);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let cached = CachedGeocoder::new(mock(), &GeocodeCacheConfig::default());

        assert!(cached.resolve("nowhere").await.is_err());
        assert!(cached.resolve("nowhere").await.is_err());
        assert_eq!(cached.inner().calls(), 2);
    }
}
