//! Relay error envelope.
//!
//! Upstream failures are logged with redacted detail; the caller only ever
//! sees `{"error": "Proxy error"}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crumb_core::CrumbError;
use crumb_logging::redact_sensitive_data;

/// Message returned to the caller for every upstream failure.
pub const PROXY_ERROR: &str = "Proxy error";

/// Message returned when the request body is not a JSON object.
pub const INVALID_BODY: &str = "Invalid request body";

#[derive(Debug, Error)]
pub enum RelayError {
    /// The caller sent something other than a JSON object.
    #[error("invalid request body: {0}")]
    InvalidBody(String),

    /// The upstream call failed or was rejected.
    #[error("upstream call failed: {0}")]
    Upstream(#[from] CrumbError),
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            RelayError::InvalidBody(reason) => {
                warn!(reason = %reason, "rejecting relay request");
                (StatusCode::BAD_REQUEST, INVALID_BODY)
            }
            RelayError::Upstream(e) => {
                error!(error = %redact_sensitive_data(&e.to_string()), "relay failed");
                (StatusCode::INTERNAL_SERVER_ERROR, PROXY_ERROR)
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
