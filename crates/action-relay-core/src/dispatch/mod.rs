mod chord_guard;
mod dispatcher;
mod input;
mod keys;
mod media;

pub use {
    chord_guard::ChordGuard,
    dispatcher::{
        ActionDispatcher, DEFAULT_KEY_EVENT_DELAY, DEFAULT_SHORTCUT_HOLD, DispatchOptions,
        ExecutionReport, synthesize_chord,
    },
    input::{InputBackend, InputInjector},
    keys::{KeyCode, parse_shortcut},
    media::MediaKey,
};
