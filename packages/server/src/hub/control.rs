//! Hub control loop.

use std::collections::HashMap;

use tokio::{
    sync::{mpsc, mpsc::error::TrySendError},
    task::JoinHandle,
};

use crate::{
    connection::Connection,
    domain::{ConnectionId, ConnectionInfo, RelayMessage},
};

use super::handle::{HubHandle, HubRequest};

/// Registry of live connections and owner of the broadcast fan-out.
///
/// Only `run` touches `connections`, so membership needs no lock.
pub struct Hub {
    connections: HashMap<ConnectionId, Connection>,
    requests: mpsc::UnboundedReceiver<HubRequest>,
}

impl Hub {
    /// Create a hub and the handle used to reach it
    pub fn new() -> (Self, HubHandle) {
        let (requests_tx, requests) = mpsc::unbounded_channel();

        let hub = Self {
            connections: HashMap::new(),
            requests,
        };
        (hub, HubHandle { requests: requests_tx })
    }

    /// Create a hub and run its control loop on a new task
    pub fn spawn() -> (HubHandle, JoinHandle<()>) {
        let (hub, handle) = Self::new();
        (handle, tokio::spawn(hub.run()))
    }

    /// Serve requests until every handle is dropped.
    ///
    /// Requests are applied one at a time in arrival order. A connection
    /// unregistered before a broadcast was issued never receives it, and the
    /// broadcasts a pump issued before stopping are fanned out before its own
    /// unregistration.
    pub async fn run(mut self) {
        tracing::info!("Hub control loop started");

        while let Some(request) = self.requests.recv().await {
            match request {
                HubRequest::Register(connection) => self.register(connection),
                HubRequest::Unregister(id) => self.unregister(&id),
                HubRequest::Broadcast(message) => self.broadcast(&message),
                HubRequest::Query(reply) => {
                    let _ = reply.send(self.snapshot());
                }
            }
        }

        tracing::info!(
            "Hub control loop stopped with {} connection(s) left",
            self.connections.len()
        );
    }

    fn register(&mut self, connection: Connection) {
        let id = connection.id();
        if self.connections.insert(id, connection).is_some() {
            tracing::warn!("Connection {} registered twice, replaced", id);
        }
        tracing::debug!("Connection {} joined ({} live)", id, self.connections.len());
    }

    /// Dropping the `Connection` closes its outbound queue.
    fn unregister(&mut self, id: &ConnectionId) {
        if self.connections.remove(id).is_some() {
            tracing::debug!("Connection {} left ({} live)", id, self.connections.len());
        }
    }

    /// Enqueue on every live connection. A full or closed queue evicts that
    /// connection instead of blocking the rest.
    fn broadcast(&mut self, message: &RelayMessage) {
        tracing::debug!(
            "Broadcasting {} bytes from {} to {} connection(s)",
            message.len(),
            message.origin,
            self.connections.len()
        );

        self.connections
            .retain(|id, connection| match connection.try_enqueue(message.payload.clone()) {
                Ok(()) => true,
                Err(TrySendError::Full(_)) => {
                    tracing::warn!("Outbound queue of {} is full, disconnecting", id);
                    false
                }
                Err(TrySendError::Closed(_)) => {
                    tracing::debug!("Outbound queue of {} already closed, removing", id);
                    false
                }
            });
    }

    fn snapshot(&self) -> Vec<ConnectionInfo> {
        let mut infos: Vec<ConnectionInfo> =
            self.connections.values().map(Connection::info).collect();
        infos.sort_by(|a, b| {
            a.connected_at
                .cmp(&b.connected_at)
                .then_with(|| a.id.as_uuid().cmp(b.id.as_uuid()))
        });
        infos
    }
}
