use std::{fmt, net::SocketAddr, sync::Arc};

use tokio::{
    sync::mpsc::{self, error::TrySendError},
    task::AbortHandle,
};
use tracing::debug;
use uuid::Uuid;

/// Identifier of one accepted connection. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientId(Uuid);

impl ClientId {
    /// A fresh random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ClientId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A registered client: its peer address, the bounded queue feeding its
/// writer task, and the tasks that own its socket halves.
///
/// Dropping the connection aborts those tasks, which closes the socket.
pub struct ClientConnection {
    id: ClientId,
    addr: SocketAddr,
    outbound: mpsc::Sender<Arc<str>>,
    tasks: Vec<AbortHandle>,
}

impl ClientConnection {
    /// Create a connection record. Lines sent to it go to `outbound`.
    pub fn new(id: ClientId, addr: SocketAddr, outbound: mpsc::Sender<Arc<str>>) -> Self {
        Self {
            id,
            addr,
            outbound,
            tasks: Vec::new(),
        }
    }

    /// Tie the lifetime of `tasks` to this connection.
    pub fn with_tasks(mut self, tasks: impl IntoIterator<Item = AbortHandle>) -> Self {
        self.tasks.extend(tasks);
        self
    }

    /// Connection id.
    pub fn id(&self) -> ClientId {
        self.id
    }

    /// Peer address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Queue one line for this client without waiting. Returns `false` if
    /// its queue is full or its writer is gone; either way the client should
    /// be disconnected.
    pub fn send(&self, line: &Arc<str>) -> bool {
        match self.outbound.try_send(Arc::clone(line)) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                debug!(client_id = %self.id, "Outbound queue full");
                false
            }
            Err(TrySendError::Closed(_)) => false,
        }
    }
}

impl Drop for ClientConnection {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

/// Live connections in registration order.
#[derive(Default)]
pub struct ConnectionRegistry {
    clients: Vec<ClientConnection>,
}

impl ConnectionRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a connection at the end of the registry.
    pub fn register(&mut self, connection: ClientConnection) {
        debug!(client_id = %connection.id, addr = %connection.addr, "Client registered");
        self.clients.push(connection);
    }

    /// Remove a connection. `None` if it was already gone.
    pub fn deregister(&mut self, id: ClientId) -> Option<ClientConnection> {
        let position = self.clients.iter().position(|c| c.id == id)?;
        let connection = self.clients.remove(position);
        debug!(client_id = %id, addr = %connection.addr, "Client deregistered");
        Some(connection)
    }

    /// Remove every connection, in registration order.
    pub fn drain(&mut self) -> Vec<ClientConnection> {
        std::mem::take(&mut self.clients)
    }

    /// Queue `line` for every client. Returns the clients that could not
    /// take it.
    pub fn broadcast(&self, line: &Arc<str>) -> Vec<ClientId> {
        self.clients
            .iter()
            .filter(|connection| !connection.send(line))
            .map(|connection| connection.id)
            .collect()
    }

    /// Queue `line` for one client. Returns `false` if it is not registered,
    /// its queue is full or its writer is gone.
    pub fn send_to(&self, id: ClientId, line: &Arc<str>) -> bool {
        self.get(id).is_some_and(|connection| connection.send(line))
    }

    /// Look a connection up by id.
    pub fn get(&self, id: ClientId) -> Option<&ClientConnection> {
        self.clients.iter().find(|c| c.id == id)
    }

    /// Peer addresses in registration order.
    pub fn addresses(&self) -> Vec<SocketAddr> {
        self.clients.iter().map(|c| c.addr).collect()
    }

    /// Number of connections.
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    /// Whether no client is connected.
    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}
