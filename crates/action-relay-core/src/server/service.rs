//! The relay event loop.
//!
//! One task owns the catalog, the connection registry and the listener.
//! Socket IO, process waits and key injection run in their own tasks and
//! report back over channels, so the loop itself never waits on a peer.

use crate::{
    ClientId, CoreResult, RelayError,
    catalog::{Action, ActionCatalog, ActionId, ActionSpec},
    dispatch::{ActionDispatcher, DispatchOptions, ExecutionReport, InputBackend},
    protocol::{ClientMessage, ServerMessage, decode_client_message, encode, encode_manifest},
    protocol::{read_frame, write_frame},
    server::{
        ClientConnection, ConnectionRegistry, RelayEvent, RelayHandle, RelayStatus, host_ipv4,
    },
};

use std::{
    net::{Ipv4Addr, SocketAddr},
    panic::Location,
    sync::Arc,
    time::Duration,
};

use error_location::ErrorLocation;
use tokio::{
    io::BufReader,
    net::{
        TcpListener, TcpStream,
        tcp::{OwnedReadHalf, OwnedWriteHalf},
    },
    sync::{broadcast, mpsc, oneshot},
    task::JoinHandle,
};
use tracing::{debug, error, info, instrument, warn};

/// Backoff after a failed `accept`, e.g. when out of file descriptors.
const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_millis(100);

const REQUEST_CAPACITY: usize = 32;

/// Lines queued per client before it counts as not reading and is dropped.
const OUTBOUND_CAPACITY: usize = 32;

/// Relay behaviour knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelayOptions {
    /// Send `action_result` messages back to the client that pressed.
    pub relay_action_results: bool,
    /// Buffered [`RelayEvent`]s per subscriber before the oldest are dropped.
    pub event_capacity: usize,
    /// Shortcut timing.
    pub dispatch: DispatchOptions,
}

impl Default for RelayOptions {
    fn default() -> Self {
        Self {
            relay_action_results: true,
            event_capacity: 64,
            dispatch: DispatchOptions::default(),
        }
    }
}

/// Requests from [`RelayHandle`]s.
pub(crate) enum Request {
    Start {
        port: u16,
        reply: oneshot::Sender<CoreResult<SocketAddr>>,
    },
    Stop {
        reply: oneshot::Sender<()>,
    },
    Status {
        reply: oneshot::Sender<RelayStatus>,
    },
    Add {
        spec: ActionSpec,
        reply: oneshot::Sender<CoreResult<ActionId>>,
    },
    Update {
        position: usize,
        spec: ActionSpec,
        reply: oneshot::Sender<bool>,
    },
    Remove {
        position: usize,
        reply: oneshot::Sender<bool>,
    },
    List {
        reply: oneshot::Sender<Vec<Action>>,
    },
    Execute {
        action_id: ActionId,
        reply: oneshot::Sender<bool>,
    },
    Shutdown,
}

/// Events from connection tasks.
pub(crate) enum Internal {
    /// A connection accepted by the listener of `generation`.
    Accepted {
        stream: TcpStream,
        addr: SocketAddr,
        generation: u64,
    },
    Message {
        client_id: ClientId,
        message: ClientMessage,
    },
    Closed {
        client_id: ClientId,
    },
}

/// A bound listener. Dropping it stops accepting and closes the socket.
struct ActiveListener {
    addr: SocketAddr,
    host_ip: Option<Ipv4Addr>,
    generation: u64,
    accept_task: JoinHandle<()>,
}

impl Drop for ActiveListener {
    fn drop(&mut self) {
        self.accept_task.abort();
    }
}

/// Owner of all relay state. Construct once with [`RelayService::new`] and
/// drive it with [`RelayService::run`].
pub struct RelayService {
    catalog: ActionCatalog,
    dispatcher: ActionDispatcher,
    registry: ConnectionRegistry,
    listener: Option<ActiveListener>,
    /// Bumped on every bind; connections from older listeners are refused.
    pub(crate) listener_generation: u64,
    /// Encoded manifest and the catalog revision it was built from.
    manifest: Option<(u64, Arc<str>)>,
    options: RelayOptions,
    events: broadcast::Sender<RelayEvent>,
    requests: mpsc::Receiver<Request>,
    internal_tx: mpsc::UnboundedSender<Internal>,
    internal_rx: mpsc::UnboundedReceiver<Internal>,
    reports: mpsc::UnboundedReceiver<ExecutionReport>,
}

impl RelayService {
    /// Build the service around a loaded catalog and return it with a handle.
    pub fn new(
        catalog: ActionCatalog,
        backend: Arc<dyn InputBackend>,
        options: RelayOptions,
    ) -> (Self, RelayHandle) {
        let (request_tx, requests) = mpsc::channel(REQUEST_CAPACITY);
        let (events, _) = broadcast::channel(options.event_capacity.max(1));
        let (internal_tx, internal_rx) = mpsc::unbounded_channel();
        let (report_tx, reports) = mpsc::unbounded_channel();

        let dispatcher = ActionDispatcher::new(backend, options.dispatch, report_tx);
        let handle = RelayHandle::new(request_tx, events.clone());

        let service = Self {
            catalog,
            dispatcher,
            registry: ConnectionRegistry::new(),
            listener: None,
            listener_generation: 0,
            manifest: None,
            options,
            events,
            requests,
            internal_tx,
            internal_rx,
            reports,
        };

        (service, handle)
    }

    /// Run until [`RelayHandle::shutdown`] is called or every handle is dropped.
    #[instrument(skip(self))]
    pub async fn run(mut self) {
        info!(action_count = self.catalog.len(), "Relay service running");

        loop {
            tokio::select! {
                request = self.requests.recv() => {
                    match request {
                        Some(Request::Shutdown) | None => {
                            info!("Relay shutdown requested");
                            break;
                        }
                        Some(request) => self.handle_request(request).await,
                    }
                }

                Some(internal) = self.internal_rx.recv() => {
                    self.handle_internal(internal);
                }

                Some(report) = self.reports.recv() => {
                    self.handle_report(report);
                }
            }
        }

        self.stop();
        info!("Relay service stopped");
    }

    async fn handle_request(&mut self, request: Request) {
        // A dropped reply receiver just means the caller stopped waiting.
        match request {
            Request::Start { port, reply } => {
                let _ = reply.send(self.start(port).await);
            }
            Request::Stop { reply } => {
                self.stop();
                let _ = reply.send(());
            }
            Request::Status { reply } => {
                let _ = reply.send(self.status());
            }
            Request::Add { spec, reply } => {
                let added = self.catalog.add(spec);
                if added.is_ok() {
                    self.catalog_changed();
                }
                let _ = reply.send(added);
            }
            Request::Update {
                position,
                spec,
                reply,
            } => {
                let changed = self.catalog.update(position, spec);
                if changed {
                    self.catalog_changed();
                }
                let _ = reply.send(changed);
            }
            Request::Remove { position, reply } => {
                let changed = self.catalog.remove(position).is_some();
                if changed {
                    self.catalog_changed();
                }
                let _ = reply.send(changed);
            }
            Request::List { reply } => {
                let _ = reply.send(self.catalog.list().to_vec());
            }
            Request::Execute { action_id, reply } => {
                let dispatched = self
                    .dispatcher
                    .execute(&self.catalog, action_id, None)
                    .is_some();
                let _ = reply.send(dispatched);
            }
            Request::Shutdown => {}
        }
    }

    pub(crate) fn handle_internal(&mut self, internal: Internal) {
        match internal {
            Internal::Accepted {
                stream,
                addr,
                generation,
            } => self.accept_client(stream, addr, generation),
            Internal::Message { client_id, message } => self.handle_message(client_id, message),
            Internal::Closed { client_id } => self.drop_client(client_id),
        }
    }

    #[instrument(skip(self))]
    pub(crate) async fn start(&mut self, port: u16) -> CoreResult<SocketAddr> {
        if let Some(listener) = &self.listener {
            debug!(addr = %listener.addr, "Already listening");
            return Ok(listener.addr);
        }

        let listener = TcpListener::bind(SocketAddr::from((Ipv4Addr::UNSPECIFIED, port)))
            .await
            .map_err(|source| RelayError::Bind {
                port,
                source,
                location: ErrorLocation::from(Location::caller()),
            })?;
        let addr = listener.local_addr()?;
        let host_ip = host_ipv4();

        self.listener_generation += 1;
        let generation = self.listener_generation;

        let accept_task = tokio::spawn(accept_loop(
            listener,
            generation,
            self.internal_tx.clone(),
        ));
        self.listener = Some(ActiveListener {
            addr,
            host_ip,
            generation,
            accept_task,
        });

        info!(addr = %addr, host_ip = ?host_ip, "Relay listening");
        self.publish(RelayEvent::Started { addr, host_ip });

        Ok(addr)
    }

    pub(crate) fn stop(&mut self) {
        let Some(listener) = self.listener.take() else {
            return;
        };
        drop(listener);

        let clients = self.registry.drain();
        let disconnected = clients.len();
        for client in clients {
            self.publish(RelayEvent::ClientDisconnected {
                client_id: client.id(),
                addr: client.addr(),
            });
        }
        if disconnected > 0 {
            self.publish(RelayEvent::ClientCountChanged(0));
        }

        info!(disconnected, "Relay stopped");
        self.publish(RelayEvent::Stopped);
    }

    pub(crate) fn status(&self) -> RelayStatus {
        RelayStatus {
            listening: self.listener.as_ref().map(|l| l.addr),
            host_ip: self.listener.as_ref().and_then(|l| l.host_ip),
            client_count: self.registry.len(),
        }
    }

    fn accept_client(&mut self, stream: TcpStream, addr: SocketAddr, generation: u64) {
        if self.listener.as_ref().map(|l| l.generation) != Some(generation) {
            debug!(addr = %addr, generation, "Dropping connection from a closed listener");
            return;
        }

        if let Err(e) = stream.set_nodelay(true) {
            debug!(addr = %addr, error = %e, "Failed to set TCP_NODELAY");
        }

        let client_id = ClientId::new();
        let (read_half, write_half) = stream.into_split();
        let (outbound_tx, outbound_rx) = mpsc::channel(OUTBOUND_CAPACITY);

        let reader = tokio::spawn(read_loop(client_id, read_half, self.internal_tx.clone()));
        let writer = tokio::spawn(write_loop(
            client_id,
            write_half,
            outbound_rx,
            self.internal_tx.clone(),
        ));

        let connection = ClientConnection::new(client_id, addr, outbound_tx)
            .with_tasks([reader.abort_handle(), writer.abort_handle()]);
        self.registry.register(connection);

        info!(client_id = %client_id, addr = %addr, "Client connected");
        self.publish(RelayEvent::ClientConnected { client_id, addr });
        self.publish(RelayEvent::ClientCountChanged(self.registry.len()));

        self.send_manifest(client_id);
    }

    fn drop_client(&mut self, client_id: ClientId) {
        let Some(connection) = self.registry.deregister(client_id) else {
            return;
        };

        info!(client_id = %client_id, addr = %connection.addr(), "Client disconnected");
        self.publish(RelayEvent::ClientDisconnected {
            client_id,
            addr: connection.addr(),
        });
        self.publish(RelayEvent::ClientCountChanged(self.registry.len()));
    }

    fn handle_message(&mut self, client_id: ClientId, message: ClientMessage) {
        if self.registry.get(client_id).is_none() {
            return;
        }

        match message {
            ClientMessage::GetActions => self.send_manifest(client_id),
            ClientMessage::ActionPress { action_id } => {
                debug!(client_id = %client_id, action_id = %action_id, "Action pressed");
                // Detached; completion arrives as an ExecutionReport.
                let _ = self
                    .dispatcher
                    .execute(&self.catalog, action_id, Some(client_id));
            }
        }
    }

    fn handle_report(&mut self, report: ExecutionReport) {
        let ExecutionReport {
            action_id,
            requester,
            success,
            output,
        } = report;

        if let Some(client_id) = requester.filter(|_| self.options.relay_action_results) {
            let message = ServerMessage::ActionResult {
                action_id,
                success,
                output: output.clone(),
            };
            match encode(&message) {
                Ok(line) => {
                    if !self.registry.send_to(client_id, &line) {
                        debug!(client_id = %client_id, "Result not relayed");
                        self.drop_client(client_id);
                    }
                }
                Err(e) => error!(error = ?e, "Failed to encode action result"),
            }
        }

        self.publish(RelayEvent::ActionExecuted {
            action_id,
            success,
            output,
        });
    }

    /// Manifest line for the current catalog, encoded once per revision.
    pub(crate) fn manifest_line(&mut self) -> Option<Arc<str>> {
        let revision = self.catalog.revision();
        if let Some((cached, line)) = &self.manifest {
            if *cached == revision {
                return Some(Arc::clone(line));
            }
        }

        match encode_manifest(self.catalog.list()) {
            Ok(line) => {
                self.manifest = Some((revision, Arc::clone(&line)));
                Some(line)
            }
            Err(e) => {
                error!(error = ?e, "Failed to encode manifest");
                None
            }
        }
    }

    fn send_manifest(&mut self, client_id: ClientId) {
        let Some(line) = self.manifest_line() else {
            return;
        };
        if !self.registry.send_to(client_id, &line) {
            debug!(client_id = %client_id, "Client not keeping up, disconnecting");
            self.drop_client(client_id);
        }
    }

    /// Full-state broadcast: one encoding, queued to every client.
    fn catalog_changed(&mut self) {
        if let Some(line) = self.manifest_line() {
            let lagging = self.registry.broadcast(&line);
            debug!(lagging = lagging.len(), "Manifest broadcast");
            for client_id in lagging {
                self.drop_client(client_id);
            }
        }
        self.publish(RelayEvent::CatalogChanged);
    }

    fn publish(&self, event: RelayEvent) {
        // Err only means nobody is subscribed.
        let _ = self.events.send(event);
    }
}

async fn accept_loop(
    listener: TcpListener,
    generation: u64,
    internal: mpsc::UnboundedSender<Internal>,
) {
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let accepted = Internal::Accepted {
                    stream,
                    addr,
                    generation,
                };
                if internal.send(accepted).is_err() {
                    break;
                }
            }
            Err(e) => {
                warn!(error = %e, "Accept failed");
                tokio::time::sleep(ACCEPT_ERROR_BACKOFF).await;
            }
        }
    }
}

async fn read_loop(
    client_id: ClientId,
    read_half: OwnedReadHalf,
    internal: mpsc::UnboundedSender<Internal>,
) {
    let mut reader = BufReader::new(read_half);

    loop {
        match read_frame(&mut reader).await {
            Ok(Some(line)) => {
                let Some(message) = decode_client_message(&line) else {
                    continue;
                };
                if internal
                    .send(Internal::Message { client_id, message })
                    .is_err()
                {
                    return;
                }
            }
            Ok(None) => {
                debug!(client_id = %client_id, "Peer closed connection");
                break;
            }
            Err(e) => {
                warn!(client_id = %client_id, error = ?e, "Closing connection after read error");
                break;
            }
        }
    }

    let _ = internal.send(Internal::Closed { client_id });
}

async fn write_loop(
    client_id: ClientId,
    mut write_half: OwnedWriteHalf,
    mut outbound: mpsc::Receiver<Arc<str>>,
    internal: mpsc::UnboundedSender<Internal>,
) {
    while let Some(line) = outbound.recv().await {
        if let Err(e) = write_frame(&mut write_half, &line).await {
            debug!(client_id = %client_id, error = ?e, "Write failed");
            let _ = internal.send(Internal::Closed { client_id });
            return;
        }
    }
}
