//! Web layer for the charging-station service.
//!
//! Provides HTTP endpoints for station search, station detail and user
//! favorites.

mod dto;
mod error;
mod routes;
mod state;

pub use dto::*;
pub use error::AppError;
pub use routes::{cors_layer, create_router};
pub use state::AppState;
