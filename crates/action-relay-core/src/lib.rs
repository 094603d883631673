//! Action Relay Core Library
//!
//! Lets a remote macro pad trigger local actions over TCP: launching a
//! program, sending a media key, or synthesizing a keyboard shortcut. The
//! remote's button list is kept in sync with an editable, persisted catalog.
//!
//! # Example
//!
//! ```no_run
//! use action_relay_core::{
//!     ActionCatalog, ActionSpec, CoreResult, InputBackend, RelayOptions, RelayService,
//!     TomlCatalogStore,
//! };
//!
//! use std::sync::Arc;
//!
//! async fn serve(backend: Arc<dyn InputBackend>) -> CoreResult<()> {
//!     let store = TomlCatalogStore::new("actions.toml");
//!     let catalog = ActionCatalog::open(Box::new(store))?;
//!
//!     let (service, handle) = RelayService::new(catalog, backend, RelayOptions::default());
//!     tokio::spawn(service.run());
//!
//!     let addr = handle.start(8080).await?;
//!     println!("Listening on {}", addr);
//!
//!     handle
//!         .add_action(ActionSpec::shortcut("Lock", "Meta+L"))
//!         .await?;
//!     Ok(())
//! }
//! ```

mod catalog;
mod dispatch;
mod error;
mod protocol;
mod server;

pub use {
    catalog::{
        Action, ActionCatalog, ActionId, ActionKind, ActionSpec, CatalogStore,
        MemoryCatalogStore, StoredCatalog, TomlCatalogStore,
    },
    dispatch::{
        ActionDispatcher, ChordGuard, DEFAULT_KEY_EVENT_DELAY, DEFAULT_SHORTCUT_HOLD,
        DispatchOptions, ExecutionReport, InputBackend, InputInjector, KeyCode, MediaKey,
        parse_shortcut, synthesize_chord,
    },
    error::{RelayError, Result as CoreResult},
    protocol::{
        ClientMessage, MAX_FRAME_SIZE, MAX_INLINE_ICON_BYTES, ManifestEntry, PLACEHOLDER_ICON,
        ServerMessage, decode_client_message, encode, encode_manifest, manifest, mime_type,
        read_frame, resolve_icon, write_frame,
    },
    server::{
        ClientConnection, ClientId, ConnectionRegistry, RelayEvent, RelayHandle, RelayOptions,
        RelayService, RelayStatus, host_ipv4,
    },
};
