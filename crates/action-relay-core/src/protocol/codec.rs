//! Wire messages.
//!
//! Each message is one JSON object on its own line. The `type` field selects
//! the variant.

use crate::{
    CoreResult, RelayError,
    catalog::{Action, ActionId},
    protocol::resolve_icon,
};

use std::{panic::Location, sync::Arc};

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One button in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Action id to send back in `action_press`.
    pub id: ActionId,
    /// Button label.
    pub name: String,
    /// Resolved icon: placeholder, resource reference or `data:` URI.
    pub icon: String,
}

impl From<&Action> for ManifestEntry {
    fn from(action: &Action) -> Self {
        Self {
            id: action.id,
            name: action.name.clone(),
            icon: resolve_icon(&action.icon),
        }
    }
}

/// Messages sent from the relay to a remote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Full catalog manifest.
    Actions {
        /// Buttons in catalog order.
        actions: Vec<ManifestEntry>,
    },
    /// Outcome of a process launched on behalf of this client.
    ActionResult {
        /// Action that ran.
        #[serde(rename = "actionId")]
        action_id: ActionId,
        /// Exited normally with status 0.
        success: bool,
        /// Captured standard output.
        output: String,
    },
}

/// Messages sent from a remote to the relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Run an action.
    ActionPress {
        /// Action to run.
        #[serde(rename = "actionId")]
        action_id: ActionId,
    },
    /// Resend the manifest.
    GetActions,
}

/// Build the manifest message for `actions`.
pub fn manifest(actions: &[Action]) -> ServerMessage {
    ServerMessage::Actions {
        actions: actions.iter().map(ManifestEntry::from).collect(),
    }
}

/// Serialize a message to a single line (without the trailing newline).
///
/// The result is shared so one encoding can be queued to every client.
#[track_caller]
pub fn encode(message: &ServerMessage) -> CoreResult<Arc<str>> {
    serde_json::to_string(message)
        .map(Arc::from)
        .map_err(|e| RelayError::Protocol {
            reason: format!("Failed to encode message: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })
}

/// Encode the manifest for `actions` in one step.
#[track_caller]
pub fn encode_manifest(actions: &[Action]) -> CoreResult<Arc<str>> {
    encode(&manifest(actions))
}

/// Decode one inbound line. Malformed JSON and unknown types yield `None`.
pub fn decode_client_message(line: &str) -> Option<ClientMessage> {
    match serde_json::from_str(line) {
        Ok(message) => Some(message),
        Err(e) => {
            debug!(error = %e, "Ignoring unrecognised client message");
            None
        }
    }
}
