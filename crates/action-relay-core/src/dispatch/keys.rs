//! Shortcut key-code table.
//!
//! A shortcut is written as `+`-joined tokens, e.g. `Ctrl+Shift+A`. Tokens
//! are matched case-insensitively; anything the table does not know is
//! dropped.

use std::fmt;

use tracing::debug;

/// A platform-neutral key that can be pressed and released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// Control modifier.
    Control,
    /// Alt (Option) modifier.
    Alt,
    /// Shift modifier.
    Shift,
    /// Meta (Windows / Command / Super) modifier.
    Meta,
    /// Tab.
    Tab,
    /// Forward delete.
    Delete,
    /// Enter / Return.
    Enter,
    /// Escape.
    Escape,
    /// Space bar.
    Space,
    /// Home.
    Home,
    /// End.
    End,
    /// Page Up.
    PageUp,
    /// Page Down.
    PageDown,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Backspace.
    Backspace,
    /// Insert.
    Insert,
    /// Function key `F1`..=`F12`.
    Function(u8),
    /// A single lowercase ASCII letter or digit.
    Char(char),
}

impl KeyCode {
    /// Look up a single shortcut token.
    pub fn from_token(token: &str) -> Option<Self> {
        let token = token.trim();
        let lower = token.to_ascii_lowercase();

        let key = match lower.as_str() {
            "ctrl" | "control" => KeyCode::Control,
            "alt" | "option" => KeyCode::Alt,
            "shift" => KeyCode::Shift,
            "meta" | "win" | "super" | "cmd" | "command" => KeyCode::Meta,
            "tab" => KeyCode::Tab,
            "delete" | "del" => KeyCode::Delete,
            "enter" | "return" => KeyCode::Enter,
            "escape" | "esc" => KeyCode::Escape,
            "space" => KeyCode::Space,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" | "pgup" => KeyCode::PageUp,
            "pagedown" | "pgdown" | "pgdn" => KeyCode::PageDown,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "backspace" => KeyCode::Backspace,
            "insert" | "ins" => KeyCode::Insert,
            _ => return Self::function_key(&lower).or_else(|| Self::char_key(&lower)),
        };

        Some(key)
    }

    fn function_key(lower: &str) -> Option<Self> {
        let number: u8 = lower.strip_prefix('f')?.parse().ok()?;
        (1..=12).contains(&number).then_some(KeyCode::Function(number))
    }

    fn char_key(lower: &str) -> Option<Self> {
        let mut chars = lower.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_alphanumeric() => Some(KeyCode::Char(c)),
            _ => None,
        }
    }

    /// Whether this key is one of the four modifiers.
    pub fn is_modifier(self) -> bool {
        matches!(
            self,
            KeyCode::Control | KeyCode::Alt | KeyCode::Shift | KeyCode::Meta
        )
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyCode::Function(n) => write!(f, "F{n}"),
            KeyCode::Char(c) => write!(f, "{}", c.to_ascii_uppercase()),
            other => write!(f, "{other:?}"),
        }
    }
}

/// Parse a `+`-joined shortcut into key codes, preserving order.
///
/// Unrecognised tokens are dropped, so the result may be shorter than the
/// token list or empty.
pub fn parse_shortcut(spec: &str) -> Vec<KeyCode> {
    spec.split('+')
        .filter(|token| !token.trim().is_empty())
        .filter_map(|token| {
            let key = KeyCode::from_token(token);
            if key.is_none() {
                debug!(token = token.trim(), "Dropping unrecognised shortcut token");
            }
            key
        })
        .collect()
}
