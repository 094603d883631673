//! Keyboard and media-key injection through `enigo`.

use action_relay_core::{CoreResult, InputBackend, InputInjector, KeyCode, MediaKey, RelayError};

use std::panic::Location;

use enigo::{Direction, Enigo, Key, Keyboard, Settings};
use error_location::ErrorLocation;
use tracing::debug;

/// Opens a fresh `Enigo` per injection.
///
/// `Enigo` is not `Send`, so the relay opens one inside each blocking
/// injection task instead of sharing a long-lived instance.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnigoBackend;

impl EnigoBackend {
    pub(crate) fn new() -> Self {
        Self
    }
}

impl InputBackend for EnigoBackend {
    #[track_caller]
    fn open(&self) -> CoreResult<Box<dyn InputInjector>> {
        let enigo = Enigo::new(&Settings::default()).map_err(|e| RelayError::Input {
            reason: format!("Failed to create Enigo: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        Ok(Box::new(EnigoInjector { enigo }))
    }
}

struct EnigoInjector {
    enigo: Enigo,
}

impl EnigoInjector {
    #[track_caller]
    fn key(&mut self, key: Key, direction: Direction) -> CoreResult<()> {
        self.enigo
            .key(key, direction)
            .map_err(|e| RelayError::Input {
                reason: format!("Failed to send {:?} {:?}: {}", key, direction, e),
                location: ErrorLocation::from(Location::caller()),
            })
    }

    fn key_code(&mut self, key: KeyCode, direction: Direction) -> CoreResult<()> {
        match enigo_key(key) {
            Some(mapped) => self.key(mapped, direction),
            None => {
                debug!(key = %key, "Key not available on this platform, skipped");
                Ok(())
            }
        }
    }
}

impl InputInjector for EnigoInjector {
    fn press_key(&mut self, key: KeyCode) -> CoreResult<()> {
        self.key_code(key, Direction::Press)
    }

    fn release_key(&mut self, key: KeyCode) -> CoreResult<()> {
        self.key_code(key, Direction::Release)
    }

    #[track_caller]
    fn send_media_control(&mut self, signal: MediaKey) -> CoreResult<()> {
        match media_key(signal) {
            Some(key) => self.key(key, Direction::Click),
            None => Err(RelayError::Input {
                reason: format!("Media key {:?} is not supported on this platform", signal),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}

/// Platform key for a parsed shortcut token. `None` when the platform has no
/// such key.
pub(crate) fn enigo_key(key: KeyCode) -> Option<Key> {
    let mapped = match key {
        KeyCode::Control => Key::Control,
        KeyCode::Alt => Key::Alt,
        KeyCode::Shift => Key::Shift,
        KeyCode::Meta => Key::Meta,
        KeyCode::Tab => Key::Tab,
        KeyCode::Delete => Key::Delete,
        KeyCode::Enter => Key::Return,
        KeyCode::Escape => Key::Escape,
        KeyCode::Space => Key::Space,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::Left => Key::LeftArrow,
        KeyCode::Right => Key::RightArrow,
        KeyCode::Up => Key::UpArrow,
        KeyCode::Down => Key::DownArrow,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Insert => return insert_key(),
        KeyCode::Function(n) => return function_key(n),
        KeyCode::Char(c) => Key::Unicode(c),
    };
    Some(mapped)
}

fn function_key(n: u8) -> Option<Key> {
    let key = match n {
        1 => Key::F1,
        2 => Key::F2,
        3 => Key::F3,
        4 => Key::F4,
        5 => Key::F5,
        6 => Key::F6,
        7 => Key::F7,
        8 => Key::F8,
        9 => Key::F9,
        10 => Key::F10,
        11 => Key::F11,
        12 => Key::F12,
        _ => return None,
    };
    Some(key)
}

fn insert_key() -> Option<Key> {
    #[cfg(target_os = "macos")]
    {
        None
    }
    #[cfg(not(target_os = "macos"))]
    {
        Some(Key::Insert)
    }
}

/// Platform media key for a media action.
pub(crate) fn media_key(signal: MediaKey) -> Option<Key> {
    #[cfg(target_os = "macos")]
    {
        let _ = signal;
        None
    }
    #[cfg(not(target_os = "macos"))]
    {
        let key = match signal {
            MediaKey::PlayPause => Key::MediaPlayPause,
            MediaKey::Stop => Key::MediaStop,
            MediaKey::Next => Key::MediaNextTrack,
            MediaKey::Previous => Key::MediaPrevTrack,
            MediaKey::VolumeUp => Key::VolumeUp,
            MediaKey::VolumeDown => Key::VolumeDown,
            MediaKey::Mute => Key::VolumeMute,
        };
        Some(key)
    }
}
