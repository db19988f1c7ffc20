//! Gateway Health API

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::server::GatewayState;

/// Handler for `GET /api/health`.
pub async fn get_health(State(state): State<GatewayState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "crumb",
        "upstream": state.upstream.name(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::credentials::StaticCredentials;
    use crate::server::{build_router, GatewayState};
    use crate::upstream::VoidAiUpstream;

    #[tokio::test]
    async fn test_health_reports_ok() {
        let state = GatewayState::new(
            Arc::new(VoidAiUpstream::new()),
            Arc::new(StaticCredentials::none()),
        );
        let response = build_router(state)
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["upstream"], "voidai");
    }
}
