use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where the action catalog lives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Catalog file. Defaults to `actions.toml` in the platform data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_path: Option<PathBuf>,
}
