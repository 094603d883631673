mod input_config;
#[allow(clippy::module_inception)]
mod config;
mod server_config;
mod storage_config;

pub(crate) use {
    config::Config, input_config::InputConfig, server_config::ServerConfig,
    storage_config::StorageConfig,
};

pub(crate) const DEFAULT_PORT: u16 = 8080;
pub(crate) const DEFAULT_AUTOSTART: bool = true;
pub(crate) const DEFAULT_RELAY_ACTION_RESULTS: bool = true;
pub(crate) const DEFAULT_SHORTCUT_HOLD_MS: u64 = 50;
pub(crate) const DEFAULT_KEY_EVENT_DELAY_MS: u64 = 10;

pub(crate) fn default_port() -> u16 {
    DEFAULT_PORT
}

pub(crate) fn default_autostart() -> bool {
    DEFAULT_AUTOSTART
}

pub(crate) fn default_relay_action_results() -> bool {
    DEFAULT_RELAY_ACTION_RESULTS
}

pub(crate) fn default_shortcut_hold_ms() -> u64 {
    DEFAULT_SHORTCUT_HOLD_MS
}

pub(crate) fn default_key_event_delay_ms() -> u64 {
    DEFAULT_KEY_EVENT_DELAY_MS
}
