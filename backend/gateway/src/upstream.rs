use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use reqwest::Client;
use serde_json::{Map, Value};
use tracing::debug;

use crumb_core::error::Result;
use crumb_core::{ByteStream, CrumbError, UpstreamClient};

/// Default VoidAI API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.voidai.app/v1";

/// VoidAI chat-completions client (OpenAI-compatible wire format).
pub struct VoidAiUpstream {
    client: Client,
    base_url: String,
}

impl VoidAiUpstream {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

impl Default for VoidAiUpstream {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UpstreamClient for VoidAiUpstream {
    fn name(&self) -> &str {
        "voidai"
    }

    async fn stream_completion(
        &self,
        body: &Map<String, Value>,
        api_key: Option<&str>,
    ) -> Result<ByteStream> {
        let url = self.completions_url();
        debug!(url = %url, "Sending request to VoidAI");

        let mut request = self.client.post(&url).json(body);
        if let Some(key) = api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| CrumbError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(CrumbError::UpstreamStatus {
                status: status.as_u16(),
                body: error_body,
            });
        }

        Ok(response
            .bytes_stream()
            .map_err(std::io::Error::other)
            .boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Bytes;
    use axum::http::{header, HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use tokio::net::TcpListener;

    async fn echo_auth(headers: HeaderMap, Json(body): Json<Value>) -> String {
        let auth = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("none");
        format!("{auth}|{}", body["model"])
    }

    /// Local stand-in for the provider; returns its base URL.
    async fn spawn_provider() -> String {
        let app = Router::new()
            .route("/ok/chat/completions", post(echo_auth))
            .route(
                "/denied/chat/completions",
                post(|| async { (StatusCode::UNAUTHORIZED, "bad key") }),
            );
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        format!("http://{addr}")
    }

    async fn read_all(stream: ByteStream) -> String {
        let chunks: Vec<Bytes> = stream.try_collect().await.unwrap();
        String::from_utf8(chunks.concat()).unwrap()
    }

    fn body() -> Map<String, Value> {
        let mut body = Map::new();
        body.insert("model".into(), Value::String("m".into()));
        body
    }

    #[test]
    fn test_completions_url_joins_cleanly() {
        let up = VoidAiUpstream::new().with_base_url("http://localhost:9000/v1/");
        assert_eq!(up.completions_url(), "http://localhost:9000/v1/chat/completions");
        assert_eq!(
            VoidAiUpstream::default().completions_url(),
            "https://api.voidai.app/v1/chat/completions"
        );
    }

    #[tokio::test]
    async fn test_bearer_header_only_when_key_present() {
        let base = spawn_provider().await;
        let up = VoidAiUpstream::new().with_base_url(format!("{base}/ok"));

        let with_key = up.stream_completion(&body(), Some("k-123")).await.unwrap();
        assert_eq!(read_all(with_key).await, "Bearer k-123|\"m\"");

        let without = up.stream_completion(&body(), None).await.unwrap();
        assert_eq!(read_all(without).await, "none|\"m\"");
    }

    #[tokio::test]
    async fn test_non_success_status_is_error() {
        let base = spawn_provider().await;
        let up = VoidAiUpstream::new().with_base_url(format!("{base}/denied"));

        let err = up.stream_completion(&body(), None).await.err().unwrap();
        match err {
            CrumbError::UpstreamStatus { status, body } => {
                assert_eq!(status, 401);
                assert_eq!(body, "bad key");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
