use crate::{AppResult, config::Config};

use action_relay_core::{
    ActionCatalog, InputBackend, RelayEvent, RelayHandle, RelayService, TomlCatalogStore,
};

use std::{future::Future, sync::Arc};

use tokio::{
    sync::broadcast::{self, error::RecvError},
    task::JoinHandle,
};
use tracing::{error, info, instrument, warn};

/// Main application state.
///
/// Owns the relay service task and a handle to it, and logs relay events
/// until asked to shut down.
pub struct App {
    pub(crate) config: Config,
    pub(crate) handle: RelayHandle,
    pub(crate) events: broadcast::Receiver<RelayEvent>,
    pub(crate) service_task: JoinHandle<()>,
}

impl App {
    /// Open the catalog and spawn the relay service. Must be called inside a
    /// tokio runtime.
    #[instrument(skip(backend))]
    pub(crate) fn new(config: Config, backend: Arc<dyn InputBackend>) -> AppResult<Self> {
        let catalog_path = config.catalog_path()?;
        let catalog = ActionCatalog::open(Box::new(TomlCatalogStore::new(catalog_path.clone())))?;
        info!(catalog_path = ?catalog_path, action_count = catalog.len(), "Catalog loaded");

        let (service, handle) = RelayService::new(catalog, backend, config.relay_options());
        let events = handle.subscribe();
        let service_task = tokio::spawn(service.run());

        Ok(Self {
            config,
            handle,
            events,
            service_task,
        })
    }

    /// Run until Ctrl-C.
    pub(crate) async fn run(self) -> AppResult<()> {
        self.run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = ?e, "Failed to listen for Ctrl-C");
            }
        })
        .await
    }

    /// Start the relay if configured to, log events until `shutdown`
    /// resolves, then stop the relay and end the service.
    #[instrument(skip_all)]
    pub(crate) async fn run_until(mut self, shutdown: impl Future<Output = ()>) -> AppResult<()> {
        info!("Action-Relay starting");

        if self.config.server.autostart {
            let addr = self.handle.start(self.config.server.port).await?;
            let status = self.handle.status().await?;
            match status.host_ip {
                Some(host_ip) => info!(
                    "Remotes can connect to {}:{}",
                    host_ip,
                    addr.port()
                ),
                None => warn!(port = addr.port(), "No non-loopback IPv4 address found"),
            }
        } else {
            info!("Autostart disabled, relay not listening");
        }

        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown requested");
                    break;
                }

                event = self.events.recv() => {
                    match event {
                        Ok(event) => log_event(&event),
                        Err(RecvError::Lagged(skipped)) => {
                            warn!(skipped, "Relay events dropped");
                        }
                        Err(RecvError::Closed) => {
                            info!("Relay service ended, shutting down");
                            break;
                        }
                    }
                }
            }
        }

        // Fails only if the service already ended.
        if let Err(e) = self.handle.stop().await {
            warn!(error = ?e, "Relay stop failed");
        }
        if let Err(e) = self.handle.shutdown().await {
            warn!(error = ?e, "Relay shutdown failed");
        }

        match tokio::time::timeout(std::time::Duration::from_secs(1), self.service_task).await {
            Ok(Ok(())) => info!("Relay service stopped cleanly"),
            Ok(Err(e)) => error!(error = ?e, "Relay service task panicked"),
            Err(_) => info!("Relay service did not stop within timeout"),
        }

        info!("Action-Relay shut down successfully");

        Ok(())
    }
}

fn log_event(event: &RelayEvent) {
    match event {
        RelayEvent::Started { addr, host_ip } => {
            info!(addr = %addr, host_ip = ?host_ip, "Relay started");
        }
        RelayEvent::Stopped => info!("Relay stopped"),
        RelayEvent::ClientConnected { client_id, addr } => {
            info!(client_id = %client_id, addr = %addr, "Remote connected");
        }
        RelayEvent::ClientDisconnected { client_id, addr } => {
            info!(client_id = %client_id, addr = %addr, "Remote disconnected");
        }
        RelayEvent::ClientCountChanged(count) => info!(count, "Connected remotes"),
        RelayEvent::CatalogChanged => info!("Catalog changed"),
        RelayEvent::ActionExecuted {
            action_id,
            success,
            output,
        } => {
            if *success {
                info!(action_id = %action_id, output_len = output.len(), "Action finished");
            } else {
                warn!(action_id = %action_id, output_len = output.len(), "Action failed");
            }
        }
    }
}
