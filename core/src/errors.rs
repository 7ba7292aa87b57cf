//! Error types for Insights client operations

use thiserror::Error;

/// Boxed error produced by a caller-supplied source
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for Insights client operations
#[derive(Error, Debug)]
pub enum InsightsError {
    /// An entity, relationship or stream item source failed while being consumed.
    /// The caller's error is kept as-is and can be recovered with `downcast_ref`.
    #[error(transparent)]
    Source(BoxError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Compression error: {0}")]
    Compression(#[from] std::io::Error),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

impl InsightsError {
    /// Returns the caller's source error if this failure came from a source
    pub fn source_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            InsightsError::Source(e) => Some(e.as_ref()),
            _ => None,
        }
    }

    /// Whether the failure happened before anything was sent
    pub fn is_source(&self) -> bool {
        matches!(self, InsightsError::Source(_))
    }
}

/// Errors related to the transport that delivers payloads and logs
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Failed to create HTTP client: {0}")]
    ClientBuild(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Failed to encode request: {0}")]
    Serialization(String),
}

/// Result type alias for client operations
pub type InsightsResult<T> = Result<T, InsightsError>;

/// Result type alias for transport operations
pub type TransportResult<T> = Result<T, TransportError>;
