mod codec;
mod frame;
mod icon;

pub use {
    codec::{
        ClientMessage, ManifestEntry, ServerMessage, decode_client_message, encode,
        encode_manifest, manifest,
    },
    frame::{MAX_FRAME_SIZE, read_frame, write_frame},
    icon::{MAX_INLINE_ICON_BYTES, PLACEHOLDER_ICON, mime_type, resolve_icon},
};
