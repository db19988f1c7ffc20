//! Chat client for Crumb: the stream consumer that talks to the relay and
//! the terminal UI that renders its transcript (`crumb chat`).

pub mod app;
pub mod input;
pub mod relay_client;
pub mod render;
pub mod streaming;
pub mod terminal;

pub use app::AppState;
pub use input::{handle_key_event, InputAction};
pub use relay_client::{HttpRelayClient, DEFAULT_RELAY_URL};
pub use render::draw_ui;
pub use streaming::{ChatView, SendOutcome, StreamConsumer};
