use thiserror::Error;

/// Top-level error type for Crumb.
#[derive(Debug, Error)]
pub enum CrumbError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("upstream returned {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    #[error("relay returned {0}")]
    RelayStatus(u16),

    #[error("response has no body")]
    MissingBody,

    #[error("stream read failed: {0}")]
    Stream(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T, E = CrumbError> = std::result::Result<T, E>;
