use crate::config::{default_autostart, default_port, default_relay_action_results};

use serde::{Deserialize, Serialize};

/// Relay listener configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// TCP port the relay listens on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Start listening as soon as the app launches.
    #[serde(default = "default_autostart")]
    pub autostart: bool,
    /// Send process output back to the remote that pressed the action.
    #[serde(default = "default_relay_action_results")]
    pub relay_action_results: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            autostart: default_autostart(),
            relay_action_results: default_relay_action_results(),
        }
    }
}
