//! CLI error types.

use framehistory_host::HostError;
use framehistory_protocol::ProtocolError;
use thiserror::Error;

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Bad command-line input.
    #[error("invalid argument: {0}")]
    Argument(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON input or output error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Protocol error.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Host runtime error.
    #[error(transparent)]
    Host(#[from] HostError),
}

impl CliError {
    pub fn argument(message: impl Into<String>) -> Self {
        Self::Argument(message.into())
    }
}
