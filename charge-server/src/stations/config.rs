//! Tunables for station search and detail lookups.

use chrono::Duration;

/// Cached results older than this are refetched: 24 days.
pub const DEFAULT_FRESHNESS_MS: i64 = 2_073_600_000;

/// Radius for nearby-place queries around a station, in metres.
pub const DEFAULT_PLACES_RADIUS_M: u32 = 1500;

/// Configuration for the station services.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Maximum age of a cached result set (milliseconds).
    pub freshness_ms: i64,

    /// Nearby-place search radius (metres).
    pub places_radius_m: u32,
}

impl SearchConfig {
    /// Returns the freshness window as a Duration.
    pub fn freshness(&self) -> Duration {
        Duration::milliseconds(self.freshness_ms)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            freshness_ms: DEFAULT_FRESHNESS_MS,
            places_radius_m: DEFAULT_PLACES_RADIUS_M,
        }
    }
}
