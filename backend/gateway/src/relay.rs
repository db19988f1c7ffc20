//! Chat relay endpoint (`POST /api/voidai`).
//!
//! Forwards the caller's chat request to the completions provider with the
//! fixed defaults filled in, then pipes the provider's event stream back
//! without buffering it.

use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::Response;
use serde_json::{Map, Value};
use tracing::{debug, info, info_span, Instrument};
use uuid::Uuid;

use crumb_core::ByteStream;
use crumb_logging::mask_secret;

use crate::error::RelayError;
use crate::server::GatewayState;

/// Route the client posts chat requests to.
pub const RELAY_PATH: &str = "/api/voidai";

/// Completion model used unless the caller names another.
pub const DEFAULT_MODEL: &str = "chatgpt-4o-latest";

/// The base upstream request: `{model, stream: true}`.
pub fn default_request_body() -> Map<String, Value> {
    let mut body = Map::new();
    body.insert("model".into(), Value::String(DEFAULT_MODEL.into()));
    body.insert("stream".into(), Value::Bool(true));
    body
}

/// Shallow merge: start from `defaults`, then let every caller key win.
pub fn merge_request(defaults: &Map<String, Value>, caller: Map<String, Value>) -> Map<String, Value> {
    let mut merged = defaults.clone();
    merged.extend(caller);
    merged
}

/// Handler for `POST /api/voidai`.
pub async fn relay_chat(
    State(state): State<GatewayState>,
    body: Bytes,
) -> Result<Response, RelayError> {
    let request_id = Uuid::new_v4();
    let span = info_span!("relay", request_id = %request_id, upstream = state.upstream.name());

    async move {
        let caller = parse_body(&body)?;
        let upstream_body = merge_request(&state.defaults, caller);
        let api_key = state.credentials.api_key();

        debug!(
            model = ?upstream_body.get("model"),
            messages = upstream_body
                .get("messages")
                .and_then(serde_json::Value::as_array)
                .map(Vec::len)
                .unwrap_or(0),
            credential = ?api_key.as_deref().map(mask_secret),
            "forwarding chat request"
        );

        let stream = state
            .upstream
            .stream_completion(&upstream_body, api_key.as_deref())
            .await?;

        info!("upstream stream opened");
        Ok(event_stream_response(stream))
    }
    .instrument(span)
    .await
}

fn parse_body(body: &[u8]) -> Result<Map<String, Value>, RelayError> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(RelayError::InvalidBody("expected a JSON object".into())),
        Err(e) => Err(RelayError::InvalidBody(e.to_string())),
    }
}

/// Wrap the upstream byte stream in a `200 text/event-stream` response.
fn event_stream_response(stream: ByteStream) -> Response {
    let mut response = Response::new(Body::from_stream(stream));
    *response.status_mut() = StatusCode::OK;
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/event-stream"));
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
    response
}
