use thiserror::Error;

/// Failures turning channel frames into messages and back.
#[derive(Debug, Error)]
pub enum WireError {
    #[error("failed to decode frame: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("failed to encode message: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("unknown event '{0}'")]
    UnknownEvent(String),
}
