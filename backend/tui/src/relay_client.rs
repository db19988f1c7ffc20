use async_trait::async_trait;
use futures_util::{StreamExt, TryStreamExt};
use reqwest::Client;
use tracing::debug;

use crumb_core::error::Result;
use crumb_core::{ByteStream, CrumbError, RelayClient, RelayRequest};

/// Default relay endpoint for a gateway running locally on port 3000.
pub const DEFAULT_RELAY_URL: &str = "http://localhost:3000/api/voidai";

/// Posts chat requests to the relay over HTTP.
pub struct HttpRelayClient {
    client: Client,
    url: String,
}

impl HttpRelayClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Default for HttpRelayClient {
    fn default() -> Self {
        Self::new(DEFAULT_RELAY_URL)
    }
}

#[async_trait]
impl RelayClient for HttpRelayClient {
    async fn open_stream(&self, request: &RelayRequest) -> Result<ByteStream> {
        debug!(url = %self.url, messages = request.messages.len(), "posting to relay");

        let response = self
            .client
            .post(&self.url)
            .json(request)
            .send()
            .await
            .map_err(|e| CrumbError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CrumbError::RelayStatus(status.as_u16()));
        }
        if response.content_length() == Some(0) {
            return Err(CrumbError::MissingBody);
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
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Answer a single request with `response` verbatim; returns the relay URL.
    async fn serve_once(response: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 8192];
            let _ = socket.read(&mut buf).await;
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });
        format!("http://{addr}/api/voidai")
    }

    async fn open(url: String) -> Result<String> {
        let client = HttpRelayClient::new(url);
        let stream = client
            .open_stream(&RelayRequest::new(vec![crumb_core::ChatMessage::user("hi")]))
            .await?;
        let chunks: Vec<_> = stream.try_collect().await.map_err(|e| CrumbError::Stream(e.to_string()))?;
        Ok(chunks.iter().map(|c| String::from_utf8_lossy(c)).collect())
    }

    #[test]
    fn test_default_points_at_local_relay() {
        assert_eq!(HttpRelayClient::default().url(), "http://localhost:3000/api/voidai");
    }

    #[tokio::test]
    async fn test_streams_event_body() {
        let url = serve_once(
            "HTTP/1.1 200 OK\r\ncontent-type: text/event-stream\r\ncontent-length: 14\r\nconnection: close\r\n\r\ndata: [DONE]\n\n",
        )
        .await;
        assert_eq!(open(url).await.unwrap(), "data: [DONE]\n\n");
    }

    #[tokio::test]
    async fn test_error_status_is_relay_status() {
        let url = serve_once(
            "HTTP/1.1 500 Internal Server Error\r\ncontent-type: application/json\r\ncontent-length: 23\r\nconnection: close\r\n\r\n{\"error\":\"Proxy error\"}",
        )
        .await;
        assert!(matches!(open(url).await, Err(CrumbError::RelayStatus(500))));
    }

    #[tokio::test]
    async fn test_empty_body_is_missing_body() {
        let url = serve_once("HTTP/1.1 200 OK\r\ncontent-length: 0\r\nconnection: close\r\n\r\n").await;
        assert!(matches!(open(url).await, Err(CrumbError::MissingBody)));
    }

    #[tokio::test]
    async fn test_unreachable_relay_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let result = open(format!("http://{addr}/api/voidai")).await;
        assert!(matches!(result, Err(CrumbError::Transport(_))));
    }
}
