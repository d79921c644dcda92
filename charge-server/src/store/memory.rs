//! In-process store backend.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{LocationKey, NormalizedStation, StationResultCache, User, UserId};

use super::{StationStore, Store, StoreError, UserStore};

#[derive(Default)]
struct Inner {
    results: HashMap<LocationKey, StationResultCache>,
    /// `None` marks a placeholder created by `ensure_station`.
    stations: HashMap<i64, Option<NormalizedStation>>,
    users: HashMap<String, User>,
    next_user_id: UserId,
}

/// Thread-safe in-memory store. Clones share the same data.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
    failing_saves: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of station entries, placeholders included.
    pub async fn station_count(&self) -> usize {
        self.inner.read().await.stations.len()
    }

    /// Make every subsequent save fail as if the database had gone away.
    /// Lookups and find-or-create keep working.
    pub fn fail_saves(&self) {
        self.failing_saves.store(true, Ordering::SeqCst);
    }

    fn check_saves(&self) -> Result<(), StoreError> {
        if self.failing_saves.load(Ordering::SeqCst) {
            return Err(StoreError::Database(sqlx::Error::PoolClosed));
        }
        Ok(())
    }
}

#[async_trait]
impl StationStore for MemoryStore {
    async fn get_or_create_results(
        &self,
        key: &LocationKey,
    ) -> Result<StationResultCache, StoreError> {
        let mut guard = self.inner.write().await;
        let record = guard
            .results
            .entry(key.clone())
            .or_insert_with(|| StationResultCache::empty(key.clone()));
        Ok(record.clone())
    }

    async fn save_results(&self, record: &StationResultCache) -> Result<(), StoreError> {
        self.check_saves()?;
        let mut guard = self.inner.write().await;
        guard
            .results
            .insert(record.location.clone(), record.clone());
        Ok(())
    }

    async fn ensure_station(&self, external_id: i64) -> Result<(), StoreError> {
        self.check_saves()?;
        let mut guard = self.inner.write().await;
        guard.stations.entry(external_id).or_insert(None);
        Ok(())
    }

    async fn upsert_station(&self, station: &NormalizedStation) -> Result<(), StoreError> {
        self.check_saves()?;
        let mut guard = self.inner.write().await;
        guard
            .stations
            .insert(station.external_id, Some(station.clone()));
        Ok(())
    }

    async fn station(&self, external_id: i64) -> Result<Option<NormalizedStation>, StoreError> {
        let guard = self.inner.read().await;
        Ok(guard.stations.get(&external_id).cloned().flatten())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_user(&self, username: &str) -> Result<Option<User>, StoreError> {
        let guard = self.inner.read().await;
        Ok(guard.users.get(username).cloned())
    }

    async fn create_user(&self, username: &str) -> Result<User, StoreError> {
        let mut guard = self.inner.write().await;
        if guard.users.contains_key(username) {
            return Err(StoreError::Conflict {
                kind: "user",
                id: username.to_string(),
            });
        }

        guard.next_user_id += 1;
        let user = User::new(guard.next_user_id, username);
        guard.users.insert(username.to_string(), user.clone());
        Ok(user)
    }

    async fn save_user(&self, user: &User) -> Result<(), StoreError> {
        self.check_saves()?;
        let mut guard = self.inner.write().await;
        match guard.users.get_mut(&user.username) {
            Some(existing) if existing.id == user.id => {
                *existing = user.clone();
                Ok(())
            }
            _ => Err(StoreError::NotFound {
                kind: "user",
                id: user.username.clone(),
            }),
        }
    }

    async fn pull_favorite(&self, username: &str, station_id: &str) -> Result<bool, StoreError> {
        self.check_saves()?;
        let mut guard = self.inner.write().await;
        match guard.users.get_mut(username) {
            Some(user) => {
                user.remove_favorite(station_id);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn close(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Location;
    use chrono::Utc;

    fn key() -> LocationKey {
        Location::new(37.7749, -122.4194).unwrap().rounded().key()
    }

    fn station(id: i64) -> NormalizedStation {
        NormalizedStation {
            external_id: id,
            last_updated: None,
            name: "Depot".into(),
            address: "1 Main St".into(),
            city_state_zip: "Reno, NV 89501".into(),
            latitude: 39.5,
            longitude: -119.8,
            plug_types: vec![],
            support_number: None,
            support_email: None,
            operating_hours: None,
        }
    }

    #[tokio::test]
    async fn get_or_create_creates_once() {
        let store = MemoryStore::new();

        let first = store.get_or_create_results(&key()).await.unwrap();
        assert_eq!(first, StationResultCache::empty(key()));

        let mut updated = first.clone();
        updated.replace(vec![station(1)], Utc::now());
        store.save_results(&updated).await.unwrap();

        let second = store.get_or_create_results(&key()).await.unwrap();
        assert_eq!(second, updated);
    }

    #[tokio::test]
    async fn ensure_station_does_not_clobber() {
        let store = MemoryStore::new();
        store.upsert_station(&station(5)).await.unwrap();
        store.ensure_station(5).await.unwrap();
        assert_eq!(store.station(5).await.unwrap(), Some(station(5)));
    }

    #[tokio::test]
    async fn placeholder_reads_as_none() {
        let store = MemoryStore::new();
        store.ensure_station(8).await.unwrap();
        assert_eq!(store.station_count().await, 1);
        assert_eq!(store.station(8).await.unwrap(), None);
    }

    #[tokio::test]
    async fn users_round_trip() {
        let store = MemoryStore::new();
        let mut user = store.create_user("ada").await.unwrap();
        user.add_favorite("10", "Depot", "1 Main St");
        store.save_user(&user).await.unwrap();

        let found = store.find_user("ada").await.unwrap().unwrap();
        assert_eq!(found.favorites.len(), 1);
        assert!(store.find_user("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_username_conflicts() {
        let store = MemoryStore::new();
        store.create_user("ada").await.unwrap();
        let err = store.create_user("ada").await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict { .. }));
    }

    #[tokio::test]
    async fn pull_favorite_reports_match() {
        let store = MemoryStore::new();
        let mut user = store.create_user("ada").await.unwrap();
        user.add_favorite("10", "A", "x");
        user.add_favorite("11", "B", "y");
        store.save_user(&user).await.unwrap();

        assert!(store.pull_favorite("ada", "10").await.unwrap());
        assert!(!store.pull_favorite("nobody", "10").await.unwrap());

        let found = store.find_user("ada").await.unwrap().unwrap();
        assert_eq!(found.favorites.len(), 1);
        assert_eq!(found.favorites[0].station_id, "11");
    }

    #[tokio::test]
    async fn failing_saves_leave_data_untouched() {
        let store = MemoryStore::new();
        let mut user = store.create_user("ada").await.unwrap();
        store.fail_saves();

        user.add_favorite("10", "Depot", "1 Main St");
        assert!(matches!(
            store.save_user(&user).await,
            Err(StoreError::Database(sqlx::Error::PoolClosed))
        ));
        assert!(store.upsert_station(&station(1)).await.is_err());

        let found = store.find_user("ada").await.unwrap().unwrap();
        assert!(found.favorites.is_empty());
        assert_eq!(store.station_count().await, 0);
        assert!(store.get_or_create_results(&key()).await.is_ok());
    }
}
