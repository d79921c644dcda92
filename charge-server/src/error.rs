//! Service-level errors.
//!
//! Every failure a request can hit falls into one of four kinds, which the
//! web layer maps onto distinct HTTP statuses.

use crate::store::StoreError;
use crate::upstream::UpstreamError;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Missing, malformed or contradictory input
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A geocoding, directory or places call failed
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    /// The referenced record does not exist
    #[error("{0}")]
    NotFound(String),

    /// A store operation failed
    #[error(transparent)]
    Persistence(#[from] StoreError),
}

impl ServiceError {
    /// Short machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::InvalidInput(_) => "invalid_input",
            ServiceError::Upstream(_) => "upstream",
            ServiceError::NotFound(_) => "not_found",
            ServiceError::Persistence(_) => "persistence",
        }
    }
}
