//! Document store for cached search results, stations and users.
//!
//! The store handle is constructed explicitly at startup and closed on
//! shutdown. Two backends exist: [`MemoryStore`] for tests and local runs,
//! and [`PgStore`], which keeps each record as a JSONB document in Postgres.
//!
//! There is no locking across operations. Two concurrent refreshes of the
//! same key both write, and the last write wins.

mod error;
mod memory;
mod postgres;

use async_trait::async_trait;

use crate::domain::{LocationKey, NormalizedStation, StationResultCache, User};

pub use error::StoreError;
pub use memory::MemoryStore;
pub use postgres::{DEFAULT_MAX_CONNECTIONS, PgStore};

/// Persistence for location-keyed result sets and per-id stations.
#[async_trait]
pub trait StationStore: Send + Sync {
    /// Return the record for `key`, creating an empty one if none exists.
    async fn get_or_create_results(
        &self,
        key: &LocationKey,
    ) -> Result<StationResultCache, StoreError>;

    /// Upsert a result record.
    async fn save_results(&self, record: &StationResultCache) -> Result<(), StoreError>;

    /// Make sure a station entry exists for `external_id`, without touching
    /// its contents if it does.
    async fn ensure_station(&self, external_id: i64) -> Result<(), StoreError>;

    /// Upsert a station by its external id.
    async fn upsert_station(&self, station: &NormalizedStation) -> Result<(), StoreError>;

    /// Look up a station by external id. Placeholder entries created by
    /// [`ensure_station`](Self::ensure_station) read as `None`.
    async fn station(&self, external_id: i64) -> Result<Option<NormalizedStation>, StoreError>;
}

/// Persistence for users and their favorites.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_user(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// Create a user with no favorites.
    async fn create_user(&self, username: &str) -> Result<User, StoreError>;

    /// Overwrite the stored user with `user`.
    async fn save_user(&self, user: &User) -> Result<(), StoreError>;

    /// Remove every favorite for `station_id` from the named user in one
    /// update. Returns whether a user matched.
    async fn pull_favorite(&self, username: &str, station_id: &str) -> Result<bool, StoreError>;
}

/// A complete store backend.
#[async_trait]
pub trait Store: StationStore + UserStore {
    /// Release connections. The store must not be used afterwards.
    async fn close(&self);
}
