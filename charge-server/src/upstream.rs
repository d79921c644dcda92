//! Shared plumbing for outbound HTTP calls.
//!
//! Every third-party API this service talks to (directory, places,
//! geocoding) goes through [`get_json`], so status handling, timeouts and
//! JSON decoding behave the same everywhere.

use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;

/// Default request timeout for outbound clients.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Errors from a third-party HTTP API.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// Network failure or unreadable body
    #[error("{service} request failed: {source}")]
    Http {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// No response within the configured timeout
    #[error("{service} timed out")]
    Timeout { service: &'static str },

    /// API key rejected
    #[error("{service} rejected the API key")]
    Unauthorized { service: &'static str },

    #[error("rate limited by {service}")]
    RateLimited { service: &'static str },

    /// API returned a non-success status
    #[error("{service} error {status}: {message}")]
    Api {
        service: &'static str,
        status: u16,
        message: String,
    },

    /// Response body did not match the expected shape
    #[error("{service} returned malformed JSON: {message}")]
    Json {
        service: &'static str,
        message: String,
        body: Option<String>,
    },

    /// The query resolved to nothing
    #[error("{service} found no match for {query:?}")]
    NoMatch {
        service: &'static str,
        query: String,
    },
}

impl UpstreamError {
    pub(crate) fn from_reqwest(service: &'static str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            UpstreamError::Timeout { service }
        } else {
            UpstreamError::Http {
                service,
                source: err,
            }
        }
    }

    /// Whether this error came from a request that ran out of time.
    pub fn is_timeout(&self) -> bool {
        matches!(self, UpstreamError::Timeout { .. })
    }
}

/// Build a reqwest client with an explicit timeout.
pub(crate) fn http_client(
    service: &'static str,
    timeout: Duration,
) -> Result<reqwest::Client, UpstreamError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| UpstreamError::from_reqwest(service, e))
}

/// Send a prepared GET and decode the JSON body.
pub(crate) async fn get_json<T: DeserializeOwned>(
    service: &'static str,
    request: reqwest::RequestBuilder,
) -> Result<T, UpstreamError> {
    let response = request
        .send()
        .await
        .map_err(|e| UpstreamError::from_reqwest(service, e))?;

    let status = response.status();

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(UpstreamError::Unauthorized { service });
    }

    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(UpstreamError::RateLimited { service });
    }

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(UpstreamError::Api {
            service,
            status: status.as_u16(),
            message: body,
        });
    }

    let body = response
        .text()
        .await
        .map_err(|e| UpstreamError::from_reqwest(service, e))?;

    decode(service, &body)
}

/// Decode a response body, keeping a truncated copy for diagnostics.
pub(crate) fn decode<T: DeserializeOwned>(
    service: &'static str,
    body: &str,
) -> Result<T, UpstreamError> {
    serde_json::from_str(body).map_err(|e| UpstreamError::Json {
        service,
        message: e.to_string(),
        body: Some(body.chars().take(500).collect()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = UpstreamError::Api {
            service: "directory",
            status: 500,
            message: "Internal Server Error".into(),
        };
        assert_eq!(err.to_string(), "directory error 500: Internal Server Error");

        let err = UpstreamError::NoMatch {
            service: "geocoder",
            query: "00000".into(),
        };
        assert_eq!(err.to_string(), "geocoder found no match for \"00000\"");

        assert!(UpstreamError::Timeout { service: "places" }.is_timeout());
    }

    #[test]
    fn decode_keeps_truncated_body() {
        let body = "x".repeat(2000);
        let err = decode::<serde_json::Value>("places", &body).unwrap_err();
        match err {
            UpstreamError::Json { body: Some(b), .. } => assert_eq!(b.len(), 500),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn client_builds_with_timeout() {
        assert!(http_client("directory", Duration::from_secs(5)).is_ok());
    }
}
