//! Input-injection seam.
//!
//! Platform injectors (e.g. `enigo`) are usually not `Send`, so the dispatcher
//! never holds one across threads. It holds an [`InputBackend`] instead and
//! opens a fresh [`InputInjector`] inside a blocking task for every action.

use crate::{
    CoreResult,
    dispatch::{KeyCode, MediaKey},
};

/// A live connection to the platform's input-injection facility.
pub trait InputInjector {
    /// Press and hold `key`.
    fn press_key(&mut self, key: KeyCode) -> CoreResult<()>;

    /// Release a previously pressed `key`.
    fn release_key(&mut self, key: KeyCode) -> CoreResult<()>;

    /// Emit a single media-control signal.
    fn send_media_control(&mut self, signal: MediaKey) -> CoreResult<()>;
}

/// Factory for [`InputInjector`]s, shared by the dispatcher.
pub trait InputBackend: Send + Sync + 'static {
    /// Open an injector on the current (blocking) thread.
    fn open(&self) -> CoreResult<Box<dyn InputInjector>>;
}
