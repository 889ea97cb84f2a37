/// Errors from the transport layer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("not connected to backend")]
    NotConnected,
    #[error("invalid backend url {0:?}")]
    InvalidUrl(String),
    #[error("failed to encode command: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("connection task is gone")]
    Closed,
}
