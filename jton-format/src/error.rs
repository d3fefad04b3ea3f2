//! Error types for the JTON codec

use thiserror::Error;

/// JTON error types
#[derive(Debug, Error)]
pub enum JtonError {
    /// Input contains a value outside the JSON domain
    #[error("Unsupported value: {0}")]
    UnsupportedValue(String),
    /// Decoder input is not valid JSON text
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    /// Envelope claims to be encoded but violates descriptor grammar
    #[error("Malformed input: {0}")]
    MalformedInput(String),
    /// Recursion guard tripped
    #[error("Nesting depth limit exceeded")]
    DepthExceeded,
    /// A decode-side resource cap was hit
    #[error("Limit exceeded: {0}")]
    LimitExceeded(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, JtonError>;
