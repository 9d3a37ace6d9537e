use thiserror::Error;

/// Errors raised by node descriptor sources.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("node fetch failed: {0}")]
    Fetch(String),

    #[error("malformed node descriptor: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("descriptor transport failed: {0}")]
    Io(#[from] std::io::Error),
}
