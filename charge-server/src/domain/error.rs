//! Domain error types.
//!
//! These represent validation failures on caller-supplied values. They are
//! distinct from upstream and persistence errors.

/// Domain-level validation errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    /// Latitude outside [-90, 90] or not a finite number
    #[error("latitude {0} is out of range")]
    InvalidLatitude(f64),

    /// Longitude outside [-180, 180] or not a finite number
    #[error("longitude {0} is out of range")]
    InvalidLongitude(f64),
}
