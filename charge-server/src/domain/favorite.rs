//! Users and their favorite stations.

use serde::{Deserialize, Serialize};

/// Store-assigned user id.
pub type UserId = i64;

/// A station a user has bookmarked.
///
/// `station_id` is a loose reference: nothing checks that the station exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub station_id: String,
    pub title: String,
    pub address: String,

    /// Back-reference to the owning user.
    pub user: UserId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub favorites: Vec<Favorite>,
}

impl User {
    pub fn new(id: UserId, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            favorites: Vec::new(),
        }
    }

    /// Append a favorite owned by this user.
    pub fn add_favorite(
        &mut self,
        station_id: impl Into<String>,
        title: impl Into<String>,
        address: impl Into<String>,
    ) {
        self.favorites.push(Favorite {
            station_id: station_id.into(),
            title: title.into(),
            address: address.into(),
            user: self.id,
        });
    }

    /// Drop every favorite for `station_id`. Returns how many were removed.
    pub fn remove_favorite(&mut self, station_id: &str) -> usize {
        let before = self.favorites.len();
        self.favorites.retain(|f| f.station_id != station_id);
        before - self.favorites.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_sets_back_reference() {
        let mut user = User::new(42, "ada");
        user.add_favorite("1234", "Mission Bay", "1 Main St");
        assert_eq!(user.favorites.len(), 1);
        assert_eq!(user.favorites[0].user, 42);
    }

    #[test]
    fn duplicates_are_allowed_and_removed_together() {
        let mut user = User::new(1, "ada");
        user.add_favorite("1234", "A", "x");
        user.add_favorite("99", "B", "y");
        user.add_favorite("1234", "A again", "x");

        assert_eq!(user.remove_favorite("1234"), 2);
        assert_eq!(user.favorites.len(), 1);
        assert_eq!(user.favorites[0].station_id, "99");
    }

    #[test]
    fn removing_unknown_station_is_noop() {
        let mut user = User::new(1, "ada");
        user.add_favorite("1", "A", "x");
        assert_eq!(user.remove_favorite("nope"), 0);
        assert_eq!(user.favorites.len(), 1);
    }

    #[test]
    fn favorite_serializes_camel_case() {
        let fav = Favorite {
            station_id: "5".into(),
            title: "t".into(),
            address: "a".into(),
            user: 9,
        };
        let json = serde_json::to_value(&fav).unwrap();
        assert_eq!(json["stationId"], "5");
        assert_eq!(json["user"], 9);
    }
}
