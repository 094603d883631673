use crate::dispatch::MediaKey;

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable catalog identifier. Assigned from 1 upwards and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionId(pub u32);

impl ActionId {
    /// The id handed out to the first action of an empty catalog.
    pub const FIRST: ActionId = ActionId(1);

    /// The id after this one. `None` at the top of the id space, so an id
    /// can never be handed out twice.
    pub(crate) fn next(self) -> Option<ActionId> {
        self.0.checked_add(1).map(ActionId)
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Execution strategy of an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ActionKind {
    /// Launch `command` with `arguments`.
    #[default]
    ProcessCommand,
    /// Emit a media-control signal.
    MediaKey,
    /// Synthesize a keyboard chord.
    Shortcut,
}

impl ActionKind {
    /// Integer code used by the persistence layer.
    pub fn code(self) -> u8 {
        match self {
            ActionKind::ProcessCommand => 0,
            ActionKind::MediaKey => 1,
            ActionKind::Shortcut => 2,
        }
    }

    /// Inverse of [`ActionKind::code`].
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(ActionKind::ProcessCommand),
            1 => Some(ActionKind::MediaKey),
            2 => Some(ActionKind::Shortcut),
            _ => None,
        }
    }
}

/// Editable fields of an action. Used for both `add` and `update`.
///
/// All kind-specific fields are kept regardless of `kind`, so switching an
/// action's kind back and forth in an editor does not lose data.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ActionSpec {
    /// Display name shown on the remote.
    pub name: String,
    /// Program to launch (`ProcessCommand`).
    pub command: String,
    /// Whitespace-separated argument list (`ProcessCommand`).
    pub arguments: String,
    /// Empty, a platform resource reference, or an image path.
    pub icon: String,
    /// Execution strategy.
    pub kind: ActionKind,
    /// Media signal (`MediaKey`). `None` when the stored index is unmapped.
    pub media_key: Option<MediaKey>,
    /// `+`-joined key names (`Shortcut`).
    pub shortcut: String,
}

impl ActionSpec {
    /// A `ProcessCommand` action.
    pub fn process(
        name: impl Into<String>,
        command: impl Into<String>,
        arguments: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            command: command.into(),
            arguments: arguments.into(),
            kind: ActionKind::ProcessCommand,
            ..Self::default()
        }
    }

    /// A `MediaKey` action.
    pub fn media(name: impl Into<String>, key: MediaKey) -> Self {
        Self {
            name: name.into(),
            kind: ActionKind::MediaKey,
            media_key: Some(key),
            ..Self::default()
        }
    }

    /// A `Shortcut` action.
    pub fn shortcut(name: impl Into<String>, shortcut: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ActionKind::Shortcut,
            shortcut: shortcut.into(),
            ..Self::default()
        }
    }

    /// Set the icon reference.
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }
}

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    /// Immutable identifier.
    pub id: ActionId,
    /// Display name shown on the remote.
    pub name: String,
    /// Program to launch (`ProcessCommand`).
    pub command: String,
    /// Whitespace-separated argument list (`ProcessCommand`).
    pub arguments: String,
    /// Empty, a platform resource reference, or an image path.
    pub icon: String,
    /// Execution strategy.
    pub kind: ActionKind,
    /// Media signal (`MediaKey`).
    pub media_key: Option<MediaKey>,
    /// `+`-joined key names (`Shortcut`).
    pub shortcut: String,
}

impl Action {
    /// Build an action from its editable fields.
    pub fn new(id: ActionId, spec: ActionSpec) -> Self {
        let mut action = Self {
            id,
            name: String::new(),
            command: String::new(),
            arguments: String::new(),
            icon: String::new(),
            kind: ActionKind::default(),
            media_key: None,
            shortcut: String::new(),
        };
        action.apply(spec);
        action
    }

    /// Replace every editable field. The id is untouched.
    pub fn apply(&mut self, spec: ActionSpec) {
        let ActionSpec {
            name,
            command,
            arguments,
            icon,
            kind,
            media_key,
            shortcut,
        } = spec;

        self.name = name;
        self.command = command;
        self.arguments = arguments;
        self.icon = icon;
        self.kind = kind;
        self.media_key = media_key;
        self.shortcut = shortcut;
    }

    /// Arguments as argv tokens. Naive whitespace split, no quoting.
    pub fn argv(&self) -> Vec<&str> {
        self.arguments.split_whitespace().collect()
    }
}
