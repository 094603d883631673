mod event;
mod handle;
mod host;
mod registry;
mod service;

pub use {
    event::{RelayEvent, RelayStatus},
    handle::RelayHandle,
    host::host_ipv4,
    registry::{ClientConnection, ClientId, ConnectionRegistry},
    service::{RelayOptions, RelayService},
};

#[cfg(test)]
pub(crate) use service::Internal;
