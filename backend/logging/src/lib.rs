//! Structured logging for Crumb.
//!
//! Console and rolling NDJSON file output, plus redaction of provider
//! credentials before they reach any log sink.

pub mod logger;
pub mod redact;

pub use logger::init_logger;
pub use redact::{mask_secret, redact_sensitive_data};
