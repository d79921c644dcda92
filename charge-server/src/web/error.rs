//! HTTP error responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::{error, warn};

use crate::error::ServiceError;

use super::dto::ErrorResponse;

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    /// The request could not be parsed
    BadRequest { message: String },
    /// A service operation failed
    Service(ServiceError),
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        AppError::Service(e)
    }
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Service(e) => match e {
                ServiceError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
                ServiceError::Upstream(u) if u.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
                ServiceError::Upstream(_) => StatusCode::BAD_GATEWAY,
                ServiceError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            AppError::BadRequest { .. } => "invalid_input",
            AppError::Service(e) => e.kind(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let kind = self.kind();
        let message = match self {
            AppError::BadRequest { message } => message,
            AppError::Service(e) => e.to_string(),
        };

        if status.is_server_error() {
            error!(%status, kind, "{message}");
        } else {
            warn!(%status, kind, "{message}");
        }

        let body = Json(ErrorResponse {
            error: kind,
            message,
            success: false,
        });
        (status, body).into_response()
    }
}
