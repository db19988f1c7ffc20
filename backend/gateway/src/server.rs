//! Main HTTP Gateway Server.
//!
//! Routing, shared state, and the serve loop with graceful shutdown.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use serde_json::{Map, Value};
use tokio::net::TcpListener;
use tracing::{info, instrument, warn};

use crumb_core::{CredentialProvider, UpstreamClient};

use crate::health_api;
use crate::relay::{self, RELAY_PATH};

/// Application state shared across routes.
///
/// Everything here is immutable after startup; concurrent relay requests
/// share nothing mutable.
#[derive(Clone)]
pub struct GatewayState {
    pub upstream: Arc<dyn UpstreamClient>,
    pub credentials: Arc<dyn CredentialProvider>,
    /// Base request the caller body is merged over.
    pub defaults: Arc<Map<String, Value>>,
}

impl GatewayState {
    pub fn new(
        upstream: Arc<dyn UpstreamClient>,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Self {
        Self {
            upstream,
            credentials,
            defaults: Arc::new(relay::default_request_body()),
        }
    }
}

/// Build the gateway router.
pub fn build_router(state: GatewayState) -> Router {
    Router::new()
        .route(RELAY_PATH, post(relay::relay_chat))
        .route("/api/health", get(health_api::get_health))
        .with_state(state)
}

/// Serve `app` on `addr` until Ctrl-C or SIGTERM.
#[instrument(skip(app))]
pub async fn start_server(addr: SocketAddr, app: Router) -> Result<()> {
    let listener = TcpListener::bind(&addr).await?;
    info!("Gateway HTTP server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Gateway HTTP server stopped");
    Ok(())
}

/// Resolves when SIGINT (Ctrl-C) or SIGTERM is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to install CTRL+C signal handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => warn!(error = %e, "failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    info!("shutdown signal received; draining connections");
}
