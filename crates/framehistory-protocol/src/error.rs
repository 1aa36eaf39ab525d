//! Protocol error types.

use thiserror::Error;

/// Result type for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// Errors that can occur while producing or inspecting protocol artifacts.
///
/// Inbound messages never produce these: a payload that cannot be decoded is
/// simply not ours (see [`crate::decode`]).
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Failed to serialize an envelope to JSON.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The state nests deeper than a decoder will follow.
    #[error("state nests {depth} levels deep, limit is {limit}")]
    StateTooDeep { depth: usize, limit: usize },

    /// The target origin is not a `scheme://host[:port]` origin.
    #[error("invalid origin {origin:?}: {reason}")]
    InvalidOrigin { origin: String, reason: String },

    /// The URL is not a base64 `data:` URL.
    #[error("invalid data URL: {0}")]
    InvalidDataUrl(String),

    /// The document does not contain a self-posting script.
    #[error("malformed child document: {0}")]
    MalformedDocument(String),
}

impl ProtocolError {
    /// Creates an invalid origin error.
    pub fn invalid_origin(origin: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidOrigin {
            origin: origin.into(),
            reason: reason.into(),
        }
    }

    /// Creates a malformed document error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedDocument(message.into())
    }
}
