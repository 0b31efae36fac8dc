//! Connection identity and relayed message values.

use std::fmt;

use axum::extract::ws::Utf8Bytes;
use serde::Serialize;
use uuid::Uuid;

/// Identity of one live connection.
///
/// Assigned once when the connection is constructed and used as the key of
/// the hub's live set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// Generate a fresh random identity
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Snapshot of one registered connection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionInfo {
    pub id: ConnectionId,
    /// Unix timestamp when the connection was constructed (milliseconds)
    pub connected_at: i64,
}

/// A text payload received from one connection, to be fanned out to all.
///
/// `origin` is kept for logging only. Every live connection receives the
/// payload, the sender included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayMessage {
    pub origin: ConnectionId,
    pub payload: Utf8Bytes,
}

impl RelayMessage {
    pub fn new(origin: ConnectionId, payload: impl Into<Utf8Bytes>) -> Self {
        Self {
            origin,
            payload: payload.into(),
        }
    }

    /// Payload length in bytes
    pub fn len(&self) -> usize {
        self.payload.as_str().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
