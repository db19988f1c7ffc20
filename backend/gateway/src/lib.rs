//! Crumb Gateway
//!
//! The relay between the chat client and the completions provider: it
//! attaches the provider credential and fixed model parameters, forwards the
//! request, and streams the provider's server-sent events back untouched.

pub mod credentials;
pub mod error;
pub mod health_api;
pub mod relay;
pub mod server;
pub mod upstream;

pub use credentials::{EnvCredentials, StaticCredentials, API_KEY_VAR};
pub use error::RelayError;
pub use relay::{default_request_body, merge_request, DEFAULT_MODEL, RELAY_PATH};
pub use server::{build_router, start_server, GatewayState};
pub use upstream::{VoidAiUpstream, DEFAULT_BASE_URL};
