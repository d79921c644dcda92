//! EV charging station server.
//!
//! Proxies the Open Charge Map directory, caches search results per
//! rounded location, decorates station details with nearby places and
//! keeps per-user favorite stations.

pub mod config;
pub mod directory;
pub mod domain;
pub mod error;
pub mod favorites;
pub mod geocode;
pub mod places;
pub mod stations;
pub mod store;
pub mod upstream;
pub mod web;

#[cfg(test)]
mod fixtures;
