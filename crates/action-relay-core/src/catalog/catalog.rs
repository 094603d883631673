use crate::{
    CoreResult, RelayError,
    catalog::{Action, ActionId, ActionSpec, CatalogStore},
};

use std::panic::Location;

use error_location::ErrorLocation;
use tracing::{debug, error, info, instrument, warn};

/// Ordered, write-through collection of actions.
///
/// Order is insertion order and only matters for display. Execution always
/// looks actions up by id. Every successful mutation saves the full catalog
/// and bumps [`ActionCatalog::revision`]; rejected mutations do neither.
///
/// Persistence failures are logged and do not roll back the in-memory
/// change, so the catalog stays usable when the disk is not.
pub struct ActionCatalog {
    actions: Vec<Action>,
    next_id: ActionId,
    revision: u64,
    store: Box<dyn CatalogStore>,
}

impl ActionCatalog {
    /// Empty catalog bound to `store`. Nothing is read until [`load`](Self::load).
    pub fn new(store: Box<dyn CatalogStore>) -> Self {
        Self {
            actions: Vec::new(),
            next_id: ActionId::FIRST,
            revision: 0,
            store,
        }
    }

    /// Bind to `store` and load it.
    #[track_caller]
    pub fn open(store: Box<dyn CatalogStore>) -> CoreResult<Self> {
        let mut catalog = Self::new(store);
        catalog.load()?;
        Ok(catalog)
    }

    /// Replace the in-memory catalog with the stored one.
    #[instrument(skip(self))]
    pub fn load(&mut self) -> CoreResult<()> {
        let stored = self.store.load()?;
        self.actions = stored.actions;
        self.next_id = stored.next_id;
        self.revision += 1;

        info!(action_count = self.actions.len(), next_id = %self.next_id, "Catalog ready");

        Ok(())
    }

    /// Write the full catalog and id counter to the store.
    pub fn save(&self) -> CoreResult<()> {
        self.store.save(&self.actions, self.next_id)
    }

    /// Append a new action and return its id.
    ///
    /// Fails with [`RelayError::Storage`] once the id space is used up; the
    /// last id (`u32::MAX`) is kept as the exhausted counter value and never
    /// assigned.
    #[instrument(skip(self, spec), fields(name = %spec.name))]
    pub fn add(&mut self, spec: ActionSpec) -> CoreResult<ActionId> {
        let id = self.next_id;
        let Some(next_id) = id.next() else {
            warn!(next_id = %id, "Action ids exhausted, add refused");
            return Err(RelayError::Storage {
                reason: format!("No action ids left after {}", id),
                location: ErrorLocation::from(Location::caller()),
            });
        };

        self.next_id = next_id;
        self.actions.push(Action::new(id, spec));
        self.committed();

        info!(action_id = %id, "Action added");

        Ok(id)
    }

    /// Overwrite the action at `position`. Returns `false` if out of range.
    #[instrument(skip(self, spec))]
    pub fn update(&mut self, position: usize, spec: ActionSpec) -> bool {
        let Some(action) = self.actions.get_mut(position) else {
            debug!(size = self.actions.len(), "Update ignored, position out of range");
            return false;
        };

        action.apply(spec);
        let id = action.id;
        self.committed();

        info!(action_id = %id, "Action updated");

        true
    }

    /// Remove the action at `position`. Returns `None` if out of range.
    #[instrument(skip(self))]
    pub fn remove(&mut self, position: usize) -> Option<Action> {
        if position >= self.actions.len() {
            debug!(size = self.actions.len(), "Remove ignored, position out of range");
            return None;
        }

        let removed = self.actions.remove(position);
        self.committed();

        info!(action_id = %removed.id, "Action removed");

        Some(removed)
    }

    /// Actions in display order.
    pub fn list(&self) -> &[Action] {
        &self.actions
    }

    /// Look an action up by id.
    pub fn get(&self, id: ActionId) -> Option<&Action> {
        self.actions.iter().find(|action| action.id == id)
    }

    /// Current position of `id`, for callers that edit by position.
    pub fn position_of(&self, id: ActionId) -> Option<usize> {
        self.actions.iter().position(|action| action.id == id)
    }

    /// Number of actions.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Whether the catalog holds no actions.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Id the next `add` will assign.
    pub fn next_id(&self) -> ActionId {
        self.next_id
    }

    /// Change counter; increases on every load and successful mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn committed(&mut self) {
        self.revision += 1;
        if let Err(e) = self.save() {
            error!(error = ?e, "Failed to persist catalog");
        }
    }
}
