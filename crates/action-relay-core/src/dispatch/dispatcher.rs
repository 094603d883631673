//! Action execution.
//!
//! Every strategy is fire-and-forget from the caller's point of view: the
//! dispatcher spawns the work and returns immediately. Only process launches
//! report back, through the [`ExecutionReport`] channel.

use crate::{
    ClientId, CoreResult,
    catalog::{Action, ActionCatalog, ActionId, ActionKind},
    dispatch::{ChordGuard, InputBackend, KeyCode, MediaKey, parse_shortcut},
};

use std::{process::Stdio, sync::Arc, time::Duration};

use tokio::{process::Command, sync::mpsc, task::JoinHandle};
use tracing::{debug, info, instrument, warn};

/// How long a synthesized chord is held before release.
pub const DEFAULT_SHORTCUT_HOLD: Duration = Duration::from_millis(50);

/// Gap between consecutive key presses within a chord.
///
/// Some applications drop modifiers that arrive in the same instant as the
/// key they modify.
pub const DEFAULT_KEY_EVENT_DELAY: Duration = Duration::from_millis(10);

/// Timing used for shortcut synthesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchOptions {
    /// How long the full chord stays down.
    pub shortcut_hold: Duration,
    /// Pause between presses.
    pub key_event_delay: Duration,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            shortcut_hold: DEFAULT_SHORTCUT_HOLD,
            key_event_delay: DEFAULT_KEY_EVENT_DELAY,
        }
    }
}

/// Completion of a `ProcessCommand` action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionReport {
    /// Action that ran.
    pub action_id: ActionId,
    /// Client whose press triggered the run, if any.
    pub requester: Option<ClientId>,
    /// Exited normally with status 0.
    pub success: bool,
    /// Captured standard output (lossy UTF-8).
    pub output: String,
}

/// Runs catalog actions by id.
pub struct ActionDispatcher {
    backend: Arc<dyn InputBackend>,
    options: DispatchOptions,
    reports: mpsc::UnboundedSender<ExecutionReport>,
}

impl ActionDispatcher {
    /// Create a dispatcher that injects input through `backend` and sends
    /// process completions to `reports`.
    pub fn new(
        backend: Arc<dyn InputBackend>,
        options: DispatchOptions,
        reports: mpsc::UnboundedSender<ExecutionReport>,
    ) -> Self {
        Self {
            backend,
            options,
            reports,
        }
    }

    /// Execute the action with `action_id`.
    ///
    /// Returns the spawned task, or `None` when there was nothing to run:
    /// unknown id, unmapped media key, or a shortcut with no recognised keys.
    /// Dropping the handle detaches the task.
    #[instrument(skip(self, catalog))]
    pub fn execute(
        &self,
        catalog: &ActionCatalog,
        action_id: ActionId,
        requester: Option<ClientId>,
    ) -> Option<JoinHandle<()>> {
        let Some(action) = catalog.get(action_id) else {
            debug!("No action with this id, ignoring");
            return None;
        };

        match action.kind {
            ActionKind::ProcessCommand => Some(self.spawn_process(action, requester)),
            ActionKind::MediaKey => match action.media_key {
                Some(key) => Some(self.send_media(action_id, key)),
                None => {
                    debug!("Media key index is unmapped, ignoring");
                    None
                }
            },
            ActionKind::Shortcut => {
                let keys = parse_shortcut(&action.shortcut);
                if keys.is_empty() {
                    debug!(shortcut = %action.shortcut, "Shortcut has no recognised keys, ignoring");
                    return None;
                }
                Some(self.send_shortcut(action_id, keys))
            }
        }
    }

    fn spawn_process(&self, action: &Action, requester: Option<ClientId>) -> JoinHandle<()> {
        let action_id = action.id;
        let command = action.command.clone();
        let args: Vec<String> = action.argv().into_iter().map(String::from).collect();
        let reports = self.reports.clone();

        info!(action_id = %action_id, command = %command, ?args, "Launching process");

        tokio::spawn(async move {
            let (success, output) = run_process(&command, &args).await;

            info!(action_id = %action_id, success, output_len = output.len(), "Process finished");

            let report = ExecutionReport {
                action_id,
                requester,
                success,
                output,
            };
            if reports.send(report).is_err() {
                debug!(action_id = %action_id, "Report receiver gone, dropping completion");
            }
        })
    }

    fn send_media(&self, action_id: ActionId, key: MediaKey) -> JoinHandle<()> {
        let backend = Arc::clone(&self.backend);

        debug!(action_id = %action_id, ?key, "Sending media key");

        // Injectors are not Send; open one on the blocking thread.
        tokio::task::spawn_blocking(move || {
            let result = backend
                .open()
                .and_then(|mut injector| injector.send_media_control(key));
            if let Err(e) = result {
                warn!(action_id = %action_id, error = ?e, "Media key injection failed");
            }
        })
    }

    fn send_shortcut(&self, action_id: ActionId, keys: Vec<KeyCode>) -> JoinHandle<()> {
        let backend = Arc::clone(&self.backend);
        let options = self.options;

        debug!(action_id = %action_id, ?keys, "Synthesizing shortcut");

        tokio::task::spawn_blocking(move || {
            if let Err(e) = synthesize_chord(backend.as_ref(), &keys, options) {
                warn!(action_id = %action_id, error = ?e, "Shortcut synthesis failed");
            }
        })
    }
}

/// Press `keys` in order, hold, then release in reverse order.
///
/// Blocks the calling thread for the hold time.
pub fn synthesize_chord(
    backend: &dyn InputBackend,
    keys: &[KeyCode],
    options: DispatchOptions,
) -> CoreResult<()> {
    let mut injector = backend.open()?;
    let guard = ChordGuard::press(injector.as_mut(), keys, options.key_event_delay)?;

    std::thread::sleep(options.shortcut_hold);

    // Guard drops here and releases in reverse order.
    drop(guard);

    Ok(())
}

async fn run_process(command: &str, args: &[String]) -> (bool, String) {
    let output = Command::new(command)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .output()
        .await;

    match output {
        Ok(output) => (
            output.status.success(),
            String::from_utf8_lossy(&output.stdout).into_owned(),
        ),
        Err(e) => {
            warn!(command = %command, error = %e, "Failed to launch process");
            (false, String::new())
        }
    }
}
