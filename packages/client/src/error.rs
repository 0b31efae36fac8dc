//! Error types for the CLI client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClientError {
    /// The server refused the upgrade (bad method or origin)
    #[error("Server rejected the connection with HTTP {0}")]
    Rejected(u16),

    /// The relay URL cannot be used
    #[error("Invalid relay URL '{0}'")]
    InvalidUrl(String),

    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),
}
