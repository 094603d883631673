use crate::config::{default_key_event_delay_ms, default_shortcut_hold_ms};

use std::time::Duration;

use action_relay_core::DispatchOptions;
use serde::{Deserialize, Serialize};

/// Keyboard synthesis timing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputConfig {
    /// How long a shortcut chord is held before release.
    #[serde(default = "default_shortcut_hold_ms")]
    pub shortcut_hold_ms: u64,
    /// Gap between consecutive key presses in a chord.
    #[serde(default = "default_key_event_delay_ms")]
    pub key_event_delay_ms: u64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            shortcut_hold_ms: default_shortcut_hold_ms(),
            key_event_delay_ms: default_key_event_delay_ms(),
        }
    }
}

impl From<&InputConfig> for DispatchOptions {
    fn from(input: &InputConfig) -> Self {
        DispatchOptions {
            shortcut_hold: Duration::from_millis(input.shortcut_hold_ms),
            key_event_delay: Duration::from_millis(input.key_event_delay_ms),
        }
    }
}
