use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed search response: {0}")]
    Malformed(#[from] serde_json::Error),
}
