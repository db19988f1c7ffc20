use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use serde_json::{Map, Value};

use crate::error::Result;
use crate::message::RelayRequest;

/// A response body delivered as a stream of byte chunks.
pub type ByteStream = BoxStream<'static, std::io::Result<Bytes>>;

/// HTTP capability the relay uses to reach the completions provider.
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    /// Provider name, used in logs.
    fn name(&self) -> &str;

    /// Post `body` to the completions endpoint and return the streaming
    /// response body. Non-success statuses are errors.
    async fn stream_completion(
        &self,
        body: &Map<String, Value>,
        api_key: Option<&str>,
    ) -> Result<ByteStream>;
}

/// Source of the provider credential. Consulted once per relayed request.
pub trait CredentialProvider: Send + Sync {
    fn api_key(&self) -> Option<String>;
}

/// HTTP capability the client uses to reach the relay.
#[async_trait]
pub trait RelayClient: Send + Sync {
    /// Post `request` to the relay and return its event-stream body.
    ///
    /// A non-success relay status or an absent body is an error.
    async fn open_stream(&self, request: &RelayRequest) -> Result<ByteStream>;
}

#[async_trait]
impl<T: RelayClient + ?Sized> RelayClient for std::sync::Arc<T> {
    async fn open_stream(&self, request: &RelayRequest) -> Result<ByteStream> {
        (**self).open_stream(request).await
    }
}
