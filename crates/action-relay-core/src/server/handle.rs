use crate::{
    CoreResult, RelayError,
    catalog::{Action, ActionId, ActionSpec},
    server::{RelayEvent, RelayStatus, service::Request},
};

use std::{net::SocketAddr, panic::Location};

use error_location::ErrorLocation;
use tokio::sync::{broadcast, mpsc, oneshot};

/// Cloneable handle to a running [`RelayService`](crate::RelayService).
///
/// This is what UI collaborators hold: it edits the catalog, starts and stops
/// the listener, and subscribes to [`RelayEvent`]s. Catalog positions refer
/// to the order returned by [`list_actions`](Self::list_actions) at the time
/// of the call.
#[derive(Clone)]
pub struct RelayHandle {
    requests: mpsc::Sender<Request>,
    events: broadcast::Sender<RelayEvent>,
}

impl RelayHandle {
    pub(crate) fn new(requests: mpsc::Sender<Request>, events: broadcast::Sender<RelayEvent>) -> Self {
        Self { requests, events }
    }

    /// Bind and listen on `port` (0 picks a free port). Succeeds without
    /// rebinding if already listening; returns the bound address.
    pub async fn start(&self, port: u16) -> CoreResult<SocketAddr> {
        self.call(|reply| Request::Start { port, reply }).await?
    }

    /// Disconnect every client and close the listener. No-op when stopped.
    pub async fn stop(&self) -> CoreResult<()> {
        self.call(|reply| Request::Stop { reply }).await
    }

    /// Listener address, host IPv4 and client count.
    pub async fn status(&self) -> CoreResult<RelayStatus> {
        self.call(|reply| Request::Status { reply }).await
    }

    /// Append an action and broadcast the new manifest. Fails when the
    /// catalog has run out of ids.
    pub async fn add_action(&self, spec: ActionSpec) -> CoreResult<ActionId> {
        self.call(|reply| Request::Add { spec, reply }).await?
    }

    /// Overwrite the action at `position`. `false` if out of range.
    pub async fn update_action(&self, position: usize, spec: ActionSpec) -> CoreResult<bool> {
        self.call(|reply| Request::Update {
            position,
            spec,
            reply,
        })
        .await
    }

    /// Remove the action at `position`. `false` if out of range.
    pub async fn remove_action(&self, position: usize) -> CoreResult<bool> {
        self.call(|reply| Request::Remove { position, reply }).await
    }

    /// Snapshot of the catalog in display order.
    pub async fn list_actions(&self) -> CoreResult<Vec<Action>> {
        self.call(|reply| Request::List { reply }).await
    }

    /// Run an action locally, as if pressed on a remote. `false` if nothing
    /// was dispatched.
    pub async fn execute(&self, action_id: ActionId) -> CoreResult<bool> {
        self.call(|reply| Request::Execute { action_id, reply })
            .await
    }

    /// Receive relay events from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<RelayEvent> {
        self.events.subscribe()
    }

    /// Stop the service loop. Other handles fail afterwards.
    pub async fn shutdown(&self) -> CoreResult<()> {
        self.requests
            .send(Request::Shutdown)
            .await
            .map_err(|_| RelayError::ServiceUnavailable {
                reason: "Relay service already stopped".to_string(),
                location: ErrorLocation::from(Location::caller()),
            })
    }

    async fn call<T>(&self, request: impl FnOnce(oneshot::Sender<T>) -> Request) -> CoreResult<T> {
        let (reply, response) = oneshot::channel();

        self.requests
            .send(request(reply))
            .await
            .map_err(|_| RelayError::ServiceUnavailable {
                reason: "Relay service is not running".to_string(),
                location: ErrorLocation::from(Location::caller()),
            })?;

        response.await.map_err(|_| RelayError::ServiceUnavailable {
            reason: "Relay service dropped the request".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })
    }
}
