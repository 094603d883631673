//! TOML-file implementation of [`CatalogStore`].
//!
//! Layout:
//!
//! ```toml
//! next_id = 3
//!
//! [[actions]]
//! id = 1
//! name = "Terminal"
//! command = "alacritty"
//! arguments = ""
//! icon = ""
//! kind = 0
//! media_key_index = -1
//! shortcut_spec = ""
//! ```
//!
//! `kind` and `media_key_index` are the integer encodings; everything above
//! this layer works with [`ActionKind`] and [`MediaKey`].

use crate::{
    CoreResult, RelayError,
    catalog::{Action, ActionId, ActionKind, CatalogStore, StoredCatalog},
    dispatch::MediaKey,
};

use std::{
    fs,
    io::Write,
    panic::Location,
    path::{Path, PathBuf},
};

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

const UNMAPPED_MEDIA_KEY: i64 = -1;

fn default_next_id() -> u32 {
    ActionId::FIRST.0
}

fn default_media_key_index() -> i64 {
    UNMAPPED_MEDIA_KEY
}

#[derive(Debug, Serialize, Deserialize)]
struct CatalogDocument {
    #[serde(default = "default_next_id")]
    next_id: u32,
    #[serde(default)]
    actions: Vec<ActionRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ActionRecord {
    id: u32,
    #[serde(default)]
    name: String,
    #[serde(default)]
    command: String,
    #[serde(default)]
    arguments: String,
    #[serde(default)]
    icon: String,
    #[serde(default)]
    kind: u8,
    #[serde(default = "default_media_key_index")]
    media_key_index: i64,
    #[serde(default)]
    shortcut_spec: String,
}

impl From<&Action> for ActionRecord {
    fn from(action: &Action) -> Self {
        Self {
            id: action.id.0,
            name: action.name.clone(),
            command: action.command.clone(),
            arguments: action.arguments.clone(),
            icon: action.icon.clone(),
            kind: action.kind.code(),
            media_key_index: action.media_key.map_or(UNMAPPED_MEDIA_KEY, MediaKey::index),
            shortcut_spec: action.shortcut.clone(),
        }
    }
}

impl From<ActionRecord> for Action {
    fn from(record: ActionRecord) -> Self {
        let kind = ActionKind::from_code(record.kind).unwrap_or_else(|| {
            warn!(
                action_id = record.id,
                kind = record.kind,
                "Unknown action kind in catalog file, treating as process command"
            );
            ActionKind::ProcessCommand
        });

        Action {
            id: ActionId(record.id),
            name: record.name,
            command: record.command,
            arguments: record.arguments,
            icon: record.icon,
            kind,
            media_key: MediaKey::from_index(record.media_key_index),
            shortcut: record.shortcut_spec,
        }
    }
}

/// Catalog persisted as a TOML file, written atomically.
#[derive(Debug, Clone)]
pub struct TomlCatalogStore {
    path: PathBuf,
}

impl TomlCatalogStore {
    /// Store backed by the file at `path`. The file need not exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[track_caller]
    fn storage_error(reason: String) -> RelayError {
        RelayError::Storage {
            reason,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl CatalogStore for TomlCatalogStore {
    #[instrument(skip(self), fields(path = ?self.path))]
    fn load(&self) -> CoreResult<StoredCatalog> {
        if !self.path.exists() {
            info!("No catalog file found, starting with an empty catalog");
            return Ok(StoredCatalog::default());
        }

        let contents = fs::read_to_string(&self.path)
            .map_err(|e| Self::storage_error(format!("Failed to read catalog: {}", e)))?;

        let document: CatalogDocument = toml::from_str(&contents)
            .map_err(|e| Self::storage_error(format!("Failed to parse catalog: {}", e)))?;

        let actions: Vec<Action> = document.actions.into_iter().map(Action::from).collect();

        // A hand-edited file may carry a stale counter; never hand out a live id.
        let mut floor = ActionId::FIRST;
        for action in &actions {
            let after = action.id.next().ok_or_else(|| {
                Self::storage_error(format!(
                    "Action id {} leaves no id for the next action",
                    action.id
                ))
            })?;
            floor = floor.max(after);
        }
        let next_id = ActionId(document.next_id).max(floor);

        info!(
            action_count = actions.len(),
            next_id = %next_id,
            "Catalog loaded"
        );

        Ok(StoredCatalog { actions, next_id })
    }

    #[instrument(skip(self, actions), fields(path = ?self.path))]
    fn save(&self, actions: &[Action], next_id: ActionId) -> CoreResult<()> {
        let document = CatalogDocument {
            next_id: next_id.0,
            actions: actions.iter().map(ActionRecord::from).collect(),
        };

        let contents = toml::to_string_pretty(&document)
            .map_err(|e| Self::storage_error(format!("Failed to serialize catalog: {}", e)))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    Self::storage_error(format!("Failed to create catalog directory: {}", e))
                })?;
                debug!(dir = ?parent, "Created catalog directory");
            }
        }

        // Atomic write: write to temp file then rename
        let temp_path = self.path.with_extension("toml.tmp");

        let mut temp_file = fs::File::create(&temp_path).map_err(|e| {
            Self::storage_error(format!("Failed to create temp catalog file: {}", e))
        })?;

        temp_file
            .write_all(contents.as_bytes())
            .map_err(|e| Self::storage_error(format!("Failed to write temp catalog file: {}", e)))?;

        temp_file
            .sync_all()
            .map_err(|e| Self::storage_error(format!("Failed to sync temp catalog file: {}", e)))?;

        fs::rename(&temp_path, &self.path).map_err(|e| {
            Self::storage_error(format!("Failed to rename temp catalog to final: {}", e))
        })?;

        debug!(action_count = actions.len(), next_id = %next_id, "Catalog saved");

        Ok(())
    }
}
