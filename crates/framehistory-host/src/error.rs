//! Host error types.

use std::io;
use thiserror::Error;

/// Result type for host operations.
pub type HostResult<T> = Result<T, HostError>;

/// Errors reported to callers of the host runtime.
///
/// Nothing on the receiving side produces these; inbound messages that do
/// not belong to the protocol are dropped silently.
#[derive(Debug, Error)]
pub enum HostError {
    /// Protocol error (encoding, origin, document).
    #[error("protocol error: {0}")]
    Protocol(#[from] framehistory_protocol::ProtocolError),

    /// The host refused a frame operation.
    #[error("frame operation failed: {message}")]
    Frame { message: String },

    /// `push_state` was called before a frame was registered.
    #[error("no frame registered; call set_frame first")]
    NoFrame,

    /// The host refused the message listener registration.
    #[error("failed to register message listener: {message}")]
    Listener { message: String },

    /// Configuration error.
    #[error("configuration error: {message}")]
    Config { message: String },

    /// IO error while reading configuration.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl HostError {
    /// Creates a frame error.
    pub fn frame(message: impl Into<String>) -> Self {
        Self::Frame {
            message: message.into(),
        }
    }

    /// Creates a listener registration error.
    pub fn listener(message: impl Into<String>) -> Self {
        Self::Listener {
            message: message.into(),
        }
    }

    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}
