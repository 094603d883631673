use crate::{CoreResult, dispatch::InputInjector, dispatch::KeyCode};

use std::time::Duration;

use tracing::warn;

/// RAII guard that holds a chord down and releases it when dropped.
///
/// Keys are pressed in the order given and released in reverse, so modifiers
/// pressed first are released last. If a press fails part way through, the
/// keys already down are still released on drop, which prevents a stuck
/// modifier.
pub struct ChordGuard<'a> {
    injector: &'a mut dyn InputInjector,
    pressed: Vec<KeyCode>,
}

impl<'a> ChordGuard<'a> {
    /// Press every key in `keys`, pausing `key_delay` between presses, and
    /// return a guard that releases them.
    pub fn press(
        injector: &'a mut dyn InputInjector,
        keys: &[KeyCode],
        key_delay: Duration,
    ) -> CoreResult<Self> {
        let mut guard = Self {
            injector,
            pressed: Vec::with_capacity(keys.len()),
        };

        for (i, &key) in keys.iter().enumerate() {
            if i > 0 && !key_delay.is_zero() {
                std::thread::sleep(key_delay);
            }
            guard.injector.press_key(key)?;
            guard.pressed.push(key);
        }

        Ok(guard)
    }

    /// Keys currently held, in press order.
    pub fn pressed(&self) -> &[KeyCode] {
        &self.pressed
    }
}

impl Drop for ChordGuard<'_> {
    fn drop(&mut self) {
        while let Some(key) = self.pressed.pop() {
            if let Err(e) = self.injector.release_key(key) {
                warn!(key = %key, error = ?e, "Failed to release key");
            }
        }
    }
}
