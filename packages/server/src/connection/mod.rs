//! One client's connection: identity, outbound queue and the two pumps.
//!
//! `Connection` is the part handed to the hub. It holds the only sender of
//! the outbound queue, so when the hub drops it the queue closes and the
//! write pump winds down. The transport itself never leaves the pumps.

mod close;
mod read_pump;
mod write_pump;

use std::fmt::Display;

use axum::extract::ws::{Message, Utf8Bytes};
use futures_util::{Sink, Stream};
use hiroba_shared::time::now_millis;
use tokio::sync::mpsc::{self, error::TrySendError};

use crate::{
    config::RelayConfig,
    domain::{ConnectionId, ConnectionInfo, PumpError},
    hub::HubHandle,
};

pub use close::CloseGuard;
pub use read_pump::read_pump;
pub use write_pump::write_pump;

/// Receiving end of a connection's outbound queue, drained by the write pump
pub type OutboundQueue = mpsc::Receiver<Utf8Bytes>;

/// Hub-side view of one live connection
#[derive(Debug)]
pub struct Connection {
    id: ConnectionId,
    connected_at: i64,
    outbound: mpsc::Sender<Utf8Bytes>,
}

impl Connection {
    /// Create a connection with an empty outbound queue of `capacity` slots.
    ///
    /// A zero capacity is raised to one.
    pub fn new(capacity: usize) -> (Self, OutboundQueue) {
        let (outbound, queue) = mpsc::channel(capacity.max(1));
        let connection = Self {
            id: ConnectionId::generate(),
            connected_at: now_millis(),
            outbound,
        };
        (connection, queue)
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn info(&self) -> ConnectionInfo {
        ConnectionInfo {
            id: self.id,
            connected_at: self.connected_at,
        }
    }

    /// Enqueue without waiting. A full queue is reported, never awaited.
    pub(crate) fn try_enqueue(&self, payload: Utf8Bytes) -> Result<(), TrySendError<Utf8Bytes>> {
        self.outbound.try_send(payload)
    }
}

/// Run one connection from registration to teardown.
///
/// Registers a fresh `Connection`, spawns the write pump and drives the read
/// pump on the current task, so this returns only once the read pump has
/// stopped. The write pump is awaited afterwards; it is bounded by the write
/// deadline.
pub async fn serve_connection<S, R, E>(sink: S, stream: R, hub: HubHandle, config: RelayConfig)
where
    S: Sink<Message> + Unpin + Send + 'static,
    S::Error: Display,
    R: Stream<Item = Result<Message, E>> + Unpin,
    E: Display,
{
    let (connection, queue) = Connection::new(config.send_buffer_size);
    let id = connection.id();

    if let Err(e) = hub.register(connection) {
        tracing::error!("Failed to register connection {}: {}", id, e);
        return;
    }
    tracing::info!("Connection {} registered", id);

    let closer = CloseGuard::new();
    let write_task = tokio::spawn(write_pump(
        sink,
        queue,
        id,
        hub.clone(),
        closer.clone(),
        config,
    ));

    log_termination(id, "read", read_pump(stream, id, hub, closer, config).await);

    match write_task.await {
        Ok(result) => log_termination(id, "write", result),
        Err(e) => tracing::error!("Write pump of {} did not finish: {}", id, e),
    }

    tracing::info!("Connection {} closed", id);
}

fn log_termination(id: ConnectionId, pump: &str, result: Result<(), PumpError>) {
    match result {
        Ok(()) => tracing::debug!("{} pump of {} finished", pump, id),
        Err(e) => tracing::warn!("{} pump of {} terminated: {}", pump, id, e),
    }
}
