//! Postgres store backend.
//!
//! Records are kept as JSONB documents so their shape matches what the API
//! serves. Find-or-create is a single `INSERT ... ON CONFLICT ... RETURNING`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::types::Json;
use tracing::info;

use crate::domain::{Favorite, LocationKey, NormalizedStation, StationResultCache, User, UserId};

use super::{StationStore, Store, StoreError, UserStore};

/// Default connection pool size.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Postgres-backed document store.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect and apply pending migrations.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        info!(max_connections, "connected to document store");

        Ok(Self { pool })
    }
}

#[async_trait]
impl StationStore for PgStore {
    async fn get_or_create_results(
        &self,
        key: &LocationKey,
    ) -> Result<StationResultCache, StoreError> {
        let (date_updated, Json(response)): (Option<DateTime<Utc>>, Json<Vec<NormalizedStation>>) =
            sqlx::query_as(
                "
                INSERT INTO station_results (location)
                VALUES ($1)
                ON CONFLICT (location) DO UPDATE SET location = EXCLUDED.location
                RETURNING date_updated, response;
                ",
            )
            .bind(key.as_str())
            .fetch_one(&self.pool)
            .await?;

        Ok(StationResultCache {
            location: key.clone(),
            date_updated,
            response,
        })
    }

    async fn save_results(&self, record: &StationResultCache) -> Result<(), StoreError> {
        sqlx::query(
            "
            INSERT INTO station_results (location, date_updated, response)
            VALUES ($1, $2, $3)
            ON CONFLICT (location) DO UPDATE
            SET date_updated = EXCLUDED.date_updated, response = EXCLUDED.response;
            ",
        )
        .bind(record.location.as_str())
        .bind(record.date_updated)
        .bind(Json(&record.response))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn ensure_station(&self, external_id: i64) -> Result<(), StoreError> {
        sqlx::query(
            "
            INSERT INTO stations (external_id)
            VALUES ($1)
            ON CONFLICT (external_id) DO NOTHING;
            ",
        )
        .bind(external_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn upsert_station(&self, station: &NormalizedStation) -> Result<(), StoreError> {
        sqlx::query(
            "
            INSERT INTO stations (external_id, document)
            VALUES ($1, $2)
            ON CONFLICT (external_id) DO UPDATE
            SET document = EXCLUDED.document, updated_at = now();
            ",
        )
        .bind(station.external_id)
        .bind(Json(station))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn station(&self, external_id: i64) -> Result<Option<NormalizedStation>, StoreError> {
        let row: Option<(Option<Json<NormalizedStation>>,)> =
            sqlx::query_as("SELECT document FROM stations WHERE external_id = $1;")
                .bind(external_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.and_then(|(document,)| document).map(|Json(s)| s))
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_user(&self, username: &str) -> Result<Option<User>, StoreError> {
        let row: Option<(UserId, String, Json<Vec<Favorite>>)> = sqlx::query_as(
            "SELECT id, username, favorites FROM users WHERE username = $1;",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(id, username, Json(favorites))| User {
            id,
            username,
            favorites,
        }))
    }

    async fn create_user(&self, username: &str) -> Result<User, StoreError> {
        let result: Result<(UserId,), sqlx::Error> =
            sqlx::query_as("INSERT INTO users (username) VALUES ($1) RETURNING id;")
                .bind(username)
                .fetch_one(&self.pool)
                .await;

        match result {
            Ok((id,)) => Ok(User::new(id, username)),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(StoreError::Conflict {
                    kind: "user",
                    id: username.to_string(),
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn save_user(&self, user: &User) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE users SET favorites = $2 WHERE id = $1;")
            .bind(user.id)
            .bind(Json(&user.favorites))
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                kind: "user",
                id: user.username.clone(),
            });
        }

        Ok(())
    }

    async fn pull_favorite(&self, username: &str, station_id: &str) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "
            UPDATE users
            SET favorites = COALESCE(
                (SELECT jsonb_agg(f)
                 FROM jsonb_array_elements(favorites) AS f
                 WHERE f->>'stationId' IS DISTINCT FROM $2),
                '[]'::jsonb)
            WHERE username = $1;
            ",
        )
        .bind(username)
        .bind(station_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl Store for PgStore {
    async fn close(&self) {
        self.pool.close().await;
        info!("document store closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Location;

    // Requires a scratch Postgres database in DATABASE_URL.
    #[tokio::test]
    #[ignore]
    async fn documents_round_trip() {
        let url = std::env::var("DATABASE_URL").unwrap();
        let store = PgStore::connect(&url, 2).await.unwrap();

        let key = Location::new(37.7749, -122.4194).unwrap().rounded().key();
        let mut record = store.get_or_create_results(&key).await.unwrap();
        record.replace(vec![], Utc::now());
        store.save_results(&record).await.unwrap();
        let again = store.get_or_create_results(&key).await.unwrap();
        assert!(again.date_updated.is_some());

        let username = format!("user-{}", Utc::now().timestamp_nanos_opt().unwrap());
        let mut user = store.create_user(&username).await.unwrap();
        user.add_favorite("1", "A", "x");
        user.add_favorite("2", "B", "y");
        store.save_user(&user).await.unwrap();
        assert!(store.pull_favorite(&username, "1").await.unwrap());

        let found = store.find_user(&username).await.unwrap().unwrap();
        assert_eq!(found.favorites.len(), 1);
        assert_eq!(found.favorites[0].station_id, "2");

        store.close().await;
    }
}
