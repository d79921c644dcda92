//! HTTP route handlers.

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderValue, Method, header},
    routing::{delete, get, post},
};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::favorites::{FavoriteOutcome, Favorites};
use crate::stations::{SearchQuery, StationDetails, StationSearch};

use super::dto::*;
use super::error::AppError;
use super::state::AppState;

/// Create the application router.
///
/// `cors_whitelist` lists the origins allowed to make credentialed
/// cross-origin requests.
pub fn create_router(state: AppState, cors_whitelist: &[String]) -> Router {
    let station_routes = Router::new()
        .route("/stations", post(search_stations))
        .route("/id/:station_id", get(station_detail))
        .route("/add-favorite", post(add_favorite))
        .route("/remove-favorite", delete(remove_favorite));

    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .nest("/station", station_routes)
        .layer(cors_layer(cors_whitelist))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS policy: whitelisted origins only, with credentials.
pub fn cors_layer(whitelist: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = whitelist
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}

async fn index() -> Json<Value> {
    Json(json!({ "works": "HELLO!" }))
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Parse a JSON body ourselves so malformed input gets the structured
/// error body rather than the extractor's plain-text rejection.
fn parse_json<T: DeserializeOwned>(body: &Bytes) -> Result<T, AppError> {
    serde_json::from_slice(body).map_err(|e| AppError::BadRequest {
        message: format!("Invalid JSON: {e}"),
    })
}

/// Search stations by zip, city/state or coordinates.
async fn search_stations(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<StationsResponse>, AppError> {
    let query: SearchQuery = parse_json(&body)?;

    let search = StationSearch::new(
        state.geocoder.as_ref(),
        state.directory.as_ref(),
        state.store.as_ref(),
        &state.config,
    );
    let result = search.search(&query).await?;

    Ok(Json(StationsResponse {
        stations: result.stations,
        location: result.location.into(),
    }))
}

/// One station's directory record with nearby places attached.
async fn station_detail(
    State(state): State<AppState>,
    Path(station_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let station_id: i64 = station_id.trim().parse().map_err(|_| AppError::BadRequest {
        message: format!("Invalid station id: {station_id}"),
    })?;

    let details = StationDetails::new(
        state.directory.as_ref(),
        state.places.as_ref(),
        state.store.as_ref(),
        &state.config,
    );

    Ok(Json(details.detail(station_id).await?))
}

async fn add_favorite(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<FavoriteOutcome>, AppError> {
    let req: AddFavoriteRequest = parse_json(&body)?;

    let outcome = Favorites::new(state.store.as_ref())
        .add(
            &req.username,
            &req.station_number.as_id(),
            &req.title,
            &req.address,
        )
        .await?;

    Ok(Json(outcome))
}

async fn remove_favorite(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<FavoriteOutcome>, AppError> {
    let req: RemoveFavoriteRequest = parse_json(&body)?;

    let outcome = Favorites::new(state.store.as_ref())
        .remove(&req.username, &req.station_number.as_id())
        .await?;

    Ok(Json(outcome))
}
