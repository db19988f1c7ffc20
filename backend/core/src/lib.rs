pub mod accumulator;
pub mod error;
pub mod event;
pub mod message;
pub mod sse;
pub mod traits;
pub mod transcript;

pub use accumulator::{fold_chunks, ReplyAccumulator};
pub use error::CrumbError;
pub use event::{extract_delta, StreamEvent, DATA_PREFIX, DONE_SENTINEL};
pub use message::{ChatMessage, RelayRequest, Role};
pub use sse::LineDecoder;
pub use traits::{ByteStream, CredentialProvider, RelayClient, UpstreamClient};
pub use transcript::Transcript;

/// Text shown in place of the assistant reply when a send fails.
pub const APOLOGY: &str = "Sorry, something went wrong.";

/// System prompt the client prepends to every request by default.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";
