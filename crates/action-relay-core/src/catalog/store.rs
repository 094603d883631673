use crate::{
    CoreResult, RelayError,
    catalog::{Action, ActionId},
};

use std::{
    panic::Location,
    sync::{Arc, Mutex},
};

use error_location::ErrorLocation;

/// Snapshot exchanged with a [`CatalogStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCatalog {
    /// Actions in catalog order.
    pub actions: Vec<Action>,
    /// Id the next added action will receive.
    pub next_id: ActionId,
}

impl Default for StoredCatalog {
    fn default() -> Self {
        Self {
            actions: Vec::new(),
            next_id: ActionId::FIRST,
        }
    }
}

/// Durable load/save contract for the catalog.
///
/// A store that has never been written must load as
/// [`StoredCatalog::default`] rather than fail.
pub trait CatalogStore: Send + Sync {
    /// Read the whole catalog.
    fn load(&self) -> CoreResult<StoredCatalog>;

    /// Replace the stored catalog with `actions` and `next_id`.
    fn save(&self, actions: &[Action], next_id: ActionId) -> CoreResult<()>;
}

/// In-memory store. Clones share the same contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalogStore {
    inner: Arc<Mutex<Option<StoredCatalog>>>,
}

impl MemoryCatalogStore {
    /// An empty store, as on first run.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated with `catalog`.
    pub fn with_catalog(catalog: StoredCatalog) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Some(catalog))),
        }
    }

    /// Last saved snapshot, if any.
    pub fn snapshot(&self) -> Option<StoredCatalog> {
        self.inner.lock().ok().and_then(|guard| guard.clone())
    }

    #[track_caller]
    fn poisoned() -> RelayError {
        RelayError::Storage {
            reason: "Memory store lock poisoned".to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl CatalogStore for MemoryCatalogStore {
    fn load(&self) -> CoreResult<StoredCatalog> {
        let guard = self.inner.lock().map_err(|_| Self::poisoned())?;
        Ok(guard.clone().unwrap_or_default())
    }

    fn save(&self, actions: &[Action], next_id: ActionId) -> CoreResult<()> {
        let mut guard = self.inner.lock().map_err(|_| Self::poisoned())?;
        *guard = Some(StoredCatalog {
            actions: actions.to_vec(),
            next_id,
        });
        Ok(())
    }
}
