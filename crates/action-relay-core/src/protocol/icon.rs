//! Icon resolution for the manifest.
//!
//! The remote cannot read the host's filesystem, so image paths are inlined
//! as `data:` URIs. Anything that cannot be inlined degrades to
//! [`PLACEHOLDER_ICON`]; resolution never fails.

use std::{
    fs,
    path::{Path, PathBuf},
};

use base64::{Engine, engine::general_purpose::STANDARD};
use tracing::debug;

/// Icon value the remote renders as its built-in placeholder.
pub const PLACEHOLDER_ICON: &str = "placeholder";

/// Largest image file that is inlined, in bytes.
pub const MAX_INLINE_ICON_BYTES: u64 = 200_000;

/// Prefixes of references the remote resolves on its own.
const RESOURCE_PREFIXES: [&str; 5] = ["qrc:", ":/", "data:", "http://", "https://"];

const FILE_URL_PREFIX: &str = "file://";

/// Resolve an action's `icon` field into the value sent on the wire.
pub fn resolve_icon(icon: &str) -> String {
    let icon = icon.trim();

    if icon.is_empty() {
        return PLACEHOLDER_ICON.to_string();
    }

    if is_resource_reference(icon) {
        return icon.to_string();
    }

    let path = icon_path(icon);
    inline_image(&path).unwrap_or_else(|| PLACEHOLDER_ICON.to_string())
}

fn is_resource_reference(icon: &str) -> bool {
    RESOURCE_PREFIXES
        .iter()
        .any(|prefix| icon.starts_with(prefix))
}

fn icon_path(icon: &str) -> PathBuf {
    PathBuf::from(icon.strip_prefix(FILE_URL_PREFIX).unwrap_or(icon))
}

fn inline_image(path: &Path) -> Option<String> {
    let metadata = match fs::metadata(path) {
        Ok(m) => m,
        Err(e) => {
            debug!(path = ?path, error = %e, "Icon not found, using placeholder");
            return None;
        }
    };

    if !metadata.is_file() || metadata.len() > MAX_INLINE_ICON_BYTES {
        debug!(
            path = ?path,
            size = metadata.len(),
            "Icon is not a regular file or exceeds inline limit, using placeholder"
        );
        return None;
    }

    let bytes = match fs::read(path) {
        Ok(b) => b,
        Err(e) => {
            debug!(path = ?path, error = %e, "Icon unreadable, using placeholder");
            return None;
        }
    };

    // The file may have grown between stat and read.
    if bytes.len() as u64 > MAX_INLINE_ICON_BYTES {
        return None;
    }

    Some(format!(
        "data:{};base64,{}",
        mime_type(path),
        STANDARD.encode(&bytes)
    ))
}

/// MIME type by file extension, defaulting to PNG.
pub fn mime_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("svg") => "image/svg+xml",
        Some("gif") => "image/gif",
        Some("ico") => "image/x-icon",
        _ => "image/png",
    }
}
