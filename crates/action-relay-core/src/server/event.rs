use crate::{ClientId, catalog::ActionId};

use std::net::{Ipv4Addr, SocketAddr};

/// Notifications published by the relay for UI collaborators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayEvent {
    /// The listener is bound.
    Started {
        /// Bound address.
        addr: SocketAddr,
        /// First non-loopback IPv4 address of the host, for display.
        host_ip: Option<Ipv4Addr>,
    },
    /// The listener is closed and every client disconnected.
    Stopped,
    /// A client connected.
    ClientConnected {
        /// Connection id.
        client_id: ClientId,
        /// Peer address.
        addr: SocketAddr,
    },
    /// A client disconnected or was disconnected.
    ClientDisconnected {
        /// Connection id.
        client_id: ClientId,
        /// Peer address.
        addr: SocketAddr,
    },
    /// The number of connected clients changed.
    ClientCountChanged(usize),
    /// The catalog was mutated and the manifest rebroadcast.
    CatalogChanged,
    /// A `ProcessCommand` action finished.
    ActionExecuted {
        /// Action that ran.
        action_id: ActionId,
        /// Exited normally with status 0.
        success: bool,
        /// Captured standard output.
        output: String,
    },
}

/// Point-in-time view of the relay.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RelayStatus {
    /// Bound address while listening.
    pub listening: Option<SocketAddr>,
    /// First non-loopback IPv4 address of the host.
    pub host_ip: Option<Ipv4Addr>,
    /// Connected clients.
    pub client_count: usize,
}

impl RelayStatus {
    /// Whether the listener is bound.
    pub fn is_running(&self) -> bool {
        self.listening.is_some()
    }
}
