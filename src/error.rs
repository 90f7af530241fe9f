//! Error types for the barista gateway

use thiserror::Error;

/// Result type alias for gateway operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the barista gateway
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Order persistence error
    #[error("store error: {0}")]
    Store(String),

    /// Tool dispatch error (unknown tool, malformed arguments)
    #[error("tool error: {0}")]
    Tool(String),

    /// Resource not found
    #[error("not found: {0}")]
    NotFound(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
