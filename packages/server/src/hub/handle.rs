//! Cloneable client side of the hub's request channel.

use tokio::sync::{mpsc, oneshot};

use crate::{
    connection::Connection,
    domain::{ConnectionId, ConnectionInfo, HubError, RelayMessage},
};

/// One request to the control loop
#[derive(Debug)]
pub(super) enum HubRequest {
    Register(Connection),
    Unregister(ConnectionId),
    Broadcast(RelayMessage),
    Query(oneshot::Sender<Vec<ConnectionInfo>>),
}

/// Sender half of the hub's request channel.
///
/// All requests share one unbounded channel, so the hub applies each
/// sender's requests in the order they were issued and pumps never wait on
/// it. The hub loop stops once every handle has been dropped.
#[derive(Debug, Clone)]
pub struct HubHandle {
    pub(super) requests: mpsc::UnboundedSender<HubRequest>,
}

impl HubHandle {
    fn send(&self, request: HubRequest) -> Result<(), HubError> {
        self.requests.send(request).map_err(|_| HubError::Closed)
    }

    /// Add a connection to the live set.
    ///
    /// Must be called once per connection; a second registration under the
    /// same id replaces the first.
    pub fn register(&self, connection: Connection) -> Result<(), HubError> {
        self.send(HubRequest::Register(connection))
    }

    /// Remove a connection and close its outbound queue.
    ///
    /// Safe to request any number of times; only the first has an effect.
    pub fn unregister(&self, id: ConnectionId) -> Result<(), HubError> {
        self.send(HubRequest::Unregister(id))
    }

    /// Fan a message out to every live connection
    pub fn broadcast(&self, message: RelayMessage) -> Result<(), HubError> {
        self.send(HubRequest::Broadcast(message))
    }

    /// Snapshot of the live set, sorted by connection time
    pub async fn connections(&self) -> Result<Vec<ConnectionInfo>, HubError> {
        let (reply, response) = oneshot::channel();
        self.send(HubRequest::Query(reply))?;
        response.await.map_err(|_| HubError::Closed)
    }
}
