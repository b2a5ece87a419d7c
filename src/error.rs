//! Skald error types

/// Skald error types
#[derive(Debug, thiserror::Error)]
pub enum SkaldError {
    /// Provider id not recognized. Fails fast, no transport call is made.
    #[error("unknown provider: {0}")]
    UnknownProvider(String),

    /// Both the POST attempt and the GET fallback yielded no response.
    #[error("transport error: {0}")]
    Transport(String),

    /// Response text decoded but the expected field path was absent.
    ///
    /// Distinct from [`Transport`](SkaldError::Transport) so callers can tell
    /// "network worked, shape unexpected" from "network failed".
    #[error("parse error: {0}")]
    Parse(String),

    /// Request payload could not be serialized.
    #[error("encode error: {0}")]
    Encode(#[from] serde_json::Error),

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),
}

/// Result type alias for skald operations
pub type Result<T> = std::result::Result<T, SkaldError>;
