//! Location-keyed station search with cache-or-refresh.

use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use serde::{Deserialize, Deserializer};
use tracing::{debug, info};

use crate::directory::{StationDirectory, normalize_station};
use crate::domain::{Location, NormalizedStation, RoundedLocation, StationResultCache};
use crate::error::ServiceError;
use crate::geocode::Geocoder;
use crate::store::StationStore;

use super::config::SearchConfig;

/// Where to search. Coordinates win when both are given; otherwise `zip`
/// is geocoded, then `city_state`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    /// Accepted as a JSON string or number.
    #[serde(default, deserialize_with = "string_or_number")]
    pub zip: Option<String>,
    pub city_state: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Result of a station search.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub stations: Vec<NormalizedStation>,

    /// The rounded location the results are keyed by.
    pub location: RoundedLocation,

    /// Whether the directory was called for this search.
    pub refreshed: bool,
}

/// Station search over a geocoder, the directory and the result cache.
pub struct StationSearch<'a, S: ?Sized> {
    geocoder: &'a dyn Geocoder,
    directory: &'a dyn StationDirectory,
    store: &'a S,
    config: &'a SearchConfig,
}

impl<'a, S: StationStore + ?Sized> StationSearch<'a, S> {
    pub fn new(
        geocoder: &'a dyn Geocoder,
        directory: &'a dyn StationDirectory,
        store: &'a S,
        config: &'a SearchConfig,
    ) -> Self {
        Self {
            geocoder,
            directory,
            store,
            config,
        }
    }

    /// Run a search as of now.
    pub async fn search(&self, query: &SearchQuery) -> Result<SearchResult, ServiceError> {
        self.search_at(query, Utc::now()).await
    }

    /// Run a search, judging cache freshness against `now`.
    pub async fn search_at(
        &self,
        query: &SearchQuery,
        now: DateTime<Utc>,
    ) -> Result<SearchResult, ServiceError> {
        let location = self.resolve_location(query).await?;
        let rounded = location.rounded();
        let key = rounded.key();

        let mut record = self.store.get_or_create_results(&key).await?;

        let refreshed = record.needs_refresh(now, self.config.freshness());
        if refreshed {
            info!(key = %key, "refreshing station results");
            self.refresh(&mut record, rounded, now).await?;
        } else {
            debug!(key = %key, count = record.response.len(), "station results served from cache");
        }

        Ok(SearchResult {
            stations: record.response,
            location: rounded,
            refreshed,
        })
    }

    async fn resolve_location(&self, query: &SearchQuery) -> Result<Location, ServiceError> {
        let coordinates = match (query.latitude, query.longitude) {
            (Some(lat), Some(lng)) => Some(Location::new(lat, lng)),
            _ => None,
        };
        if let Some(Ok(location)) = coordinates {
            return Ok(location);
        }

        let text = non_blank(query.zip.as_deref())
            .or_else(|| non_blank(query.city_state.as_deref()));

        match (text, coordinates) {
            (Some(text), _) => Ok(self.geocoder.resolve(text).await?),
            (None, Some(Err(e))) => Err(ServiceError::InvalidInput(e.to_string())),
            (None, _) => Err(ServiceError::InvalidInput(
                "provide zip, cityState, or both latitude and longitude".to_string(),
            )),
        }
    }

    /// Fetch from the directory, replace the cached record and upsert every
    /// station by id. All writes are awaited.
    async fn refresh(
        &self,
        record: &mut StationResultCache,
        rounded: RoundedLocation,
        now: DateTime<Utc>,
    ) -> Result<(), ServiceError> {
        let upstream = self.directory.stations_near(rounded).await?;
        let stations: Vec<NormalizedStation> = upstream.iter().map(normalize_station).collect();

        record.replace(stations, now);
        self.store.save_results(record).await?;

        try_join_all(record.response.iter().map(|s| self.store.upsert_station(s))).await?;

        info!(key = %record.location, count = record.response.len(), "station results refreshed");
        Ok(())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Text {
        String(String),
        Number(serde_json::Number),
    }

    Ok(Option::<Text>::deserialize(deserializer)?.map(|text| match text {
        Text::String(s) => s,
        Text::Number(n) => n.to_string(),
    }))
}
