use crate::{MAX_INLINE_ICON_BYTES, PLACEHOLDER_ICON, mime_type, resolve_icon};

use std::{fs, path::Path};

use base64::{Engine, engine::general_purpose::STANDARD};
use tempfile::tempdir;

/// WHAT: A small PNG is inlined as a data URI
/// WHY: The remote cannot read host paths
#[test]
#[allow(clippy::unwrap_used)]
fn given_150kb_png_when_resolving_then_inlined_data_uri() {
    // Given: A 150,000 byte .png file
    let dir = tempdir().unwrap();
    let path = dir.path().join("icon.png");
    fs::write(&path, vec![0x89u8; 150_000]).unwrap();

    // When: Resolving
    let icon = resolve_icon(path.to_str().unwrap());

    // Then: PNG data URI whose payload decodes to the file
    let payload = icon.strip_prefix("data:image/png;base64,").unwrap();
    assert_eq!(STANDARD.decode(payload).unwrap().len(), 150_000);
}

/// WHAT: A file exactly at the limit is still inlined
/// WHY: The limit is inclusive
#[test]
#[allow(clippy::unwrap_used)]
fn given_file_at_limit_when_resolving_then_inlined() {
    // Given: A file of exactly MAX_INLINE_ICON_BYTES
    let dir = tempdir().unwrap();
    let path = dir.path().join("edge.gif");
    fs::write(&path, vec![1u8; MAX_INLINE_ICON_BYTES as usize]).unwrap();

    // When/Then: Inlined as GIF
    assert!(resolve_icon(path.to_str().unwrap()).starts_with("data:image/gif;base64,"));
}

/// WHAT: An oversized file degrades to the placeholder
/// WHY: Large payloads would bloat every broadcast
#[test]
#[allow(clippy::unwrap_used)]
fn given_250kb_file_when_resolving_then_placeholder() {
    // Given: A 250,001 byte file
    let dir = tempdir().unwrap();
    let path = dir.path().join("huge.png");
    fs::write(&path, vec![0u8; 250_001]).unwrap();

    // When/Then: Placeholder
    assert_eq!(resolve_icon(path.to_str().unwrap()), PLACEHOLDER_ICON);
}

/// WHAT: Missing paths, directories and empty icons use the placeholder
/// WHY: A bad icon must never break the manifest
#[test]
#[allow(clippy::unwrap_used)]
fn given_unusable_icon_when_resolving_then_placeholder() {
    // Given: A directory, a missing file, and blank values
    let dir = tempdir().unwrap();
    let missing = dir.path().join("missing.png");

    // When/Then: All resolve to the placeholder
    assert_eq!(resolve_icon(dir.path().to_str().unwrap()), PLACEHOLDER_ICON);
    assert_eq!(resolve_icon(missing.to_str().unwrap()), PLACEHOLDER_ICON);
    assert_eq!(resolve_icon(""), PLACEHOLDER_ICON);
    assert_eq!(resolve_icon("   "), PLACEHOLDER_ICON);
}

/// WHAT: Platform resource references pass through unchanged
/// WHY: The remote resolves them itself
#[test]
fn given_resource_reference_when_resolving_then_unchanged() {
    // Given/When/Then: Each reference is returned as-is
    for icon in [
        "qrc:/icons/play.png",
        ":/icons/play.png",
        "https://example.com/icon.png",
        "data:image/png;base64,AAAA",
    ] {
        assert_eq!(resolve_icon(icon), icon);
    }
}

/// WHAT: file:// URLs resolve like plain paths
/// WHY: Desktop file pickers return URLs
#[test]
#[allow(clippy::unwrap_used)]
fn given_file_url_when_resolving_then_inlined() {
    // Given: A small SVG referenced by file URL
    let dir = tempdir().unwrap();
    let path = dir.path().join("logo.svg");
    fs::write(&path, "<svg/>").unwrap();
    let url = format!("file://{}", path.to_str().unwrap());

    // When/Then: Inlined as SVG
    assert_eq!(
        resolve_icon(&url),
        format!("data:image/svg+xml;base64,{}", STANDARD.encode("<svg/>"))
    );
}

/// WHAT: MIME type follows the extension, case-insensitively
/// WHY: Remotes need the right decoder
#[test]
fn given_extensions_when_choosing_mime_then_expected_types() {
    // Given/When/Then: Table of extensions
    let cases = [
        ("a.jpg", "image/jpeg"),
        ("a.JPEG", "image/jpeg"),
        ("a.svg", "image/svg+xml"),
        ("a.gif", "image/gif"),
        ("a.ico", "image/x-icon"),
        ("a.png", "image/png"),
        ("a.webp", "image/png"),
        ("noext", "image/png"),
    ];
    for (path, mime) in cases {
        assert_eq!(mime_type(Path::new(path)), mime, "path: {path}");
    }
}
