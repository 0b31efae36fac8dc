//! Error types for the relay server.

use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Rejection of an upgrade request before any connection exists
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AdmissionError {
    /// Request method cannot be upgraded
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// Origin header does not match the serving host
    #[error("Origin not allowed")]
    OriginNotAllowed,

    /// Request is not a valid websocket handshake
    #[error("Not a websocket handshake")]
    Handshake(String),
}

impl AdmissionError {
    pub fn status(&self) -> StatusCode {
        match self {
            AdmissionError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AdmissionError::OriginNotAllowed => StatusCode::FORBIDDEN,
            AdmissionError::Handshake(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AdmissionError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}

/// The hub control loop is no longer accepting requests
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HubError {
    #[error("hub control loop is not running")]
    Closed,
}

/// Reason a connection pump stopped abnormally.
///
/// Graceful endings (close frame from the peer, end of stream, outbound queue
/// closed by the hub, sibling pump already closed) are not errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PumpError {
    /// Read or write failure reported by the transport
    #[error("transport error: {0}")]
    Transport(String),

    /// No frame arrived within the read-liveness window
    #[error("no frame received within {0:?}")]
    ReadTimeout(Duration),

    /// A single write did not finish within the write deadline
    #[error("write did not complete within {0:?}")]
    WriteTimeout(Duration),

    /// Inbound frame exceeds the configured limit
    #[error("message of {size} bytes exceeds the {limit} byte limit")]
    MessageTooLarge { size: usize, limit: usize },

    /// The hub went away while the pump was still running
    #[error(transparent)]
    Hub(#[from] HubError),
}

impl PumpError {
    pub fn transport(err: impl std::fmt::Display) -> Self {
        PumpError::Transport(err.to_string())
    }
}

/// Invalid relay tuning
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

/// Session collaborator failures
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}
