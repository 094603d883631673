/// Media-control signals, in the order of their persisted index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKey {
    /// Toggle playback.
    PlayPause,
    /// Stop playback.
    Stop,
    /// Skip to the next track.
    Next,
    /// Go back to the previous track.
    Previous,
    /// Raise the output volume.
    VolumeUp,
    /// Lower the output volume.
    VolumeDown,
    /// Toggle mute.
    Mute,
}

impl MediaKey {
    /// Every media key, indexed by its table position.
    pub const TABLE: [MediaKey; 7] = [
        MediaKey::PlayPause,
        MediaKey::Stop,
        MediaKey::Next,
        MediaKey::Previous,
        MediaKey::VolumeUp,
        MediaKey::VolumeDown,
        MediaKey::Mute,
    ];

    /// Map a table index to a media key. Out-of-table indices are unmapped.
    pub fn from_index(index: i64) -> Option<Self> {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::TABLE.get(i).copied())
    }

    /// Position of this key in [`MediaKey::TABLE`].
    pub fn index(self) -> i64 {
        match self {
            MediaKey::PlayPause => 0,
            MediaKey::Stop => 1,
            MediaKey::Next => 2,
            MediaKey::Previous => 3,
            MediaKey::VolumeUp => 4,
            MediaKey::VolumeDown => 5,
            MediaKey::Mute => 6,
        }
    }
}
