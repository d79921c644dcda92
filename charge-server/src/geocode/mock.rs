//! Fixed-answer geocoder for tests and offline development.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::domain::Location;
use crate::upstream::UpstreamError;

use super::Geocoder;

/// Geocoder answering from a lookup table. Keys are matched case-insensitively.
#[derive(Clone, Default)]
pub struct MockGeocoder {
    known: Arc<HashMap<String, Location>>,
    calls: Arc<AtomicUsize>,
}

impl MockGeocoder {
    pub fn new<'a>(entries: impl IntoIterator<Item = (&'a str, Location)>) -> Self {
        let known = entries
            .into_iter()
            .map(|(query, loc)| (query.trim().to_lowercase(), loc))
            .collect();

        Self {
            known: Arc::new(known),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of `resolve` calls received.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Geocoder for MockGeocoder {
    async fn resolve(&self, query: &str) -> Result<Location, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.known
            .get(&query.trim().to_lowercase())
            .copied()
            .ok_or_else(|| UpstreamError::NoMatch {
                service: "geocoder",
                query: query.to_string(),
            })
    }
}
