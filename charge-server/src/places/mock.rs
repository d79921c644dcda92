//! In-memory places source for tests and offline development.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::Location;
use crate::upstream::UpstreamError;

use super::{PlaceCategory, PlacesSource};

/// Mock places source with fixed results per category.
#[derive(Clone, Default)]
pub struct MockPlaces {
    results: Arc<HashMap<PlaceCategory, Vec<Value>>>,
    calls: Arc<AtomicUsize>,
    failing: Arc<AtomicBool>,
}

impl MockPlaces {
    pub fn new(results: HashMap<PlaceCategory, Vec<Value>>) -> Self {
        Self {
            results: Arc::new(results),
            ..Self::default()
        }
    }

    /// Make every subsequent call time out.
    pub fn fail(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PlacesSource for MockPlaces {
    async fn nearby(
        &self,
        _center: Location,
        category: PlaceCategory,
        _radius_m: u32,
    ) -> Result<Vec<Value>, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(UpstreamError::Timeout { service: "places" });
        }
        Ok(self.results.get(&category).cloned().unwrap_or_default())
    }
}
