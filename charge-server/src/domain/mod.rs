//! Core domain types for the charging-station service.
//!
//! These types are independent of any upstream API format and of the
//! document store layout.

mod error;
mod favorite;
mod location;
mod station;

pub use error::DomainError;
pub use favorite::{Favorite, User, UserId};
pub use location::{Location, LocationKey, RoundedLocation};
pub use station::{NormalizedStation, PlugType, StationResultCache};
