//! Per-user favorite stations.
//!
//! Favorites reference stations loosely by id; nothing checks that the
//! station exists, and removing a station does not touch favorites.

use serde::Serialize;
use tracing::{debug, info};

use crate::error::ServiceError;
use crate::store::UserStore;

/// Outcome reported back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FavoriteOutcome {
    pub success: bool,
    pub message: String,
}

impl FavoriteOutcome {
    fn ok(message: &str) -> Self {
        Self {
            success: true,
            message: message.to_string(),
        }
    }
}

/// Add/remove operations on a user's favorites list.
pub struct Favorites<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S: UserStore + ?Sized> Favorites<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Append a favorite to `username`'s list.
    ///
    /// Fails with `NotFound` for an unknown username.
    pub async fn add(
        &self,
        username: &str,
        station_id: &str,
        title: &str,
        address: &str,
    ) -> Result<FavoriteOutcome, ServiceError> {
        let username = required("username", username)?;
        let station_id = required("stationNumber", station_id)?;

        let mut user = self
            .store
            .find_user(username)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Invalid username.".to_string()))?;

        user.add_favorite(station_id, title, address);
        self.store.save_user(&user).await?;

        info!(username, station_id, "favorite added");
        Ok(FavoriteOutcome::ok("Added to favorites."))
    }

    /// Remove every favorite for `station_id` from `username`'s list.
    ///
    /// Removing something that was never added, or for an unknown user, is
    /// a successful no-op.
    pub async fn remove(
        &self,
        username: &str,
        station_id: &str,
    ) -> Result<FavoriteOutcome, ServiceError> {
        let username = required("username", username)?;
        let station_id = required("stationNumber", station_id)?;

        let matched = self.store.pull_favorite(username, station_id).await?;
        if !matched {
            debug!(username, "remove-favorite matched no user");
        }

        Ok(FavoriteOutcome::ok("Removed from favorites."))
    }
}

fn required<'v>(field: &str, value: &'v str) -> Result<&'v str, ServiceError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ServiceError::InvalidInput(format!("{field} is required")));
    }
    Ok(value)
}
