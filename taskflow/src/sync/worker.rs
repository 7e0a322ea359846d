//! Background worker wiring the TUI to the async HTTP client.
//!
//! The TUI main loop is synchronous (crossterm poll-based); HTTP is async.
//! This module bridges them: [`spawn_sync`] starts a tokio task owning an
//! [`ApiClient`] and returns mpsc channel handles.
//!
//! ```text
//! TUI (main thread)  ←── SyncEvent ───  tokio background task
//!                     ─── SyncCommand →
//! ```
//!
//! The worker issues the initial fetch immediately, then processes commands
//! strictly in arrival order. There is no deduplication or cancellation:
//! two rapid mutations on the same task issue two requests and the last
//! response to resolve wins.

use tokio::sync::mpsc;

use taskflow_proto::TaskId;

use super::client::{ApiClient, SyncError};
use crate::store::Task;

/// Commands sent from the TUI main loop to the sync worker.
#[derive(Debug)]
pub enum SyncCommand {
    /// Re-fetch the full task list.
    FetchAll,
    /// Create a task. The caller has already validated the name.
    Create {
        /// Display name (non-blank).
        name: String,
        /// Free-form description.
        description: String,
    },
    /// Replace a task's name and description; `completed` is the current
    /// value, sent unchanged.
    Update {
        /// Target task.
        id: TaskId,
        /// New name (non-blank).
        name: String,
        /// New description.
        description: String,
        /// Current completion flag, unchanged by this operation.
        completed: bool,
    },
    /// Persist a flipped completion flag; name and description are the
    /// current values, sent unchanged.
    Toggle {
        /// Target task.
        id: TaskId,
        /// Current name, unchanged by this operation.
        name: String,
        /// Current description, unchanged by this operation.
        description: String,
        /// The new completion value to persist.
        completed: bool,
    },
    /// Delete a task (already optimistically removed from the store).
    Delete {
        /// Target task.
        id: TaskId,
    },
    /// Gracefully shut down the worker.
    Shutdown,
}

impl SyncCommand {
    /// The failure event the worker would have emitted for this command.
    ///
    /// Used when a command never reaches the worker (channel full or
    /// closed): feeding the matching failure event back into the app
    /// unwinds the same way a failed request does, so an optimistic
    /// removal rolls back and an in-flight marker clears instead of
    /// dangling forever.
    #[must_use]
    pub fn into_failure_event(self) -> Option<SyncEvent> {
        match self {
            Self::FetchAll => Some(SyncEvent::LoadFailed),
            Self::Create { .. } => Some(SyncEvent::CreateFailed),
            Self::Update { id, .. } => Some(SyncEvent::UpdateFailed { id }),
            Self::Toggle { id, .. } => Some(SyncEvent::ToggleFailed { id }),
            Self::Delete { id } => Some(SyncEvent::DeleteFailed { id }),
            Self::Shutdown => None,
        }
    }
}

/// Events sent from the sync worker back to the TUI main loop.
#[derive(Debug)]
pub enum SyncEvent {
    /// The initial (or re-)fetch resolved.
    Loaded(Vec<Task>),
    /// The fetch failed; the sequence is unchanged. Logged, not alerted.
    LoadFailed,
    /// A create resolved; the task carries the server-assigned id.
    Created(Task),
    /// A create failed; the sequence is untouched.
    CreateFailed,
    /// An update resolved; apply the replacement locally.
    Updated {
        /// Target task.
        id: TaskId,
        /// Confirmed name.
        name: String,
        /// Confirmed description.
        description: String,
    },
    /// An update failed; the sequence is untouched.
    UpdateFailed {
        /// Target task.
        id: TaskId,
    },
    /// A toggle resolved; apply the confirmed flag locally.
    Toggled {
        /// Target task.
        id: TaskId,
        /// Confirmed completion flag.
        completed: bool,
    },
    /// A toggle failed; local state is unchanged.
    ToggleFailed {
        /// Target task.
        id: TaskId,
    },
    /// A delete was confirmed.
    Deleted {
        /// Target task.
        id: TaskId,
    },
    /// A delete failed; the optimistic removal should be rolled back.
    DeleteFailed {
        /// Target task.
        id: TaskId,
    },
}

/// Configuration for the sync worker.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Base URL of the tasks API (no trailing slash).
    pub base_url: String,
    /// User id written on every mutation.
    pub user_id: String,
    /// Per-request HTTP timeout.
    pub request_timeout: std::time::Duration,
    /// Channel capacity for command/event mpsc channels.
    pub channel_capacity: usize,
}

/// Spawns the sync worker and returns channel handles.
///
/// The worker fetches the task list once on startup, emitting
/// [`SyncEvent::Loaded`] or
/// [`SyncEvent::LoadFailed`], then loops on commands until
/// [`SyncCommand::Shutdown`] arrives or the command channel closes.
///
/// # Errors
///
/// Returns [`SyncError`] if the HTTP client cannot be constructed.
pub fn spawn_sync(
    config: &SyncConfig,
) -> Result<(mpsc::Sender<SyncCommand>, mpsc::Receiver<SyncEvent>), SyncError> {
    let client = ApiClient::new(&config.base_url, &config.user_id, config.request_timeout)?;
    let (cmd_tx, cmd_rx) = mpsc::channel(config.channel_capacity);
    let (evt_tx, evt_rx) = mpsc::channel(config.channel_capacity);

    tokio::spawn(run_worker(client, cmd_rx, evt_tx));

    Ok((cmd_tx, evt_rx))
}

async fn run_worker(
    client: ApiClient,
    mut cmd_rx: mpsc::Receiver<SyncCommand>,
    evt_tx: mpsc::Sender<SyncEvent>,
) {
    // Fetch-on-start populates the store before any user action.
    let initial = fetch_all(&client).await;
    if evt_tx.send(initial).await.is_err() {
        return;
    }

    while let Some(cmd) = cmd_rx.recv().await {
        let event = match cmd {
            SyncCommand::FetchAll => fetch_all(&client).await,
            SyncCommand::Create { name, description } => {
                match client.create(&name, &description).await {
                    Ok(api) => SyncEvent::Created(Task::from_api(api)),
                    Err(e) => {
                        tracing::warn!(error = %e, "create task failed");
                        SyncEvent::CreateFailed
                    }
                }
            }
            SyncCommand::Update {
                id,
                name,
                description,
                completed,
            } => match client.update(&id, &name, &description, completed).await {
                Ok(()) => SyncEvent::Updated {
                    id,
                    name,
                    description,
                },
                Err(e) => {
                    tracing::warn!(task_id = %id, error = %e, "update task failed");
                    SyncEvent::UpdateFailed { id }
                }
            },
            SyncCommand::Toggle {
                id,
                name,
                description,
                completed,
            } => match client.update(&id, &name, &description, completed).await {
                Ok(()) => SyncEvent::Toggled { id, completed },
                Err(e) => {
                    tracing::warn!(task_id = %id, error = %e, "toggle task failed");
                    SyncEvent::ToggleFailed { id }
                }
            },
            SyncCommand::Delete { id } => match client.delete(&id).await {
                Ok(()) => SyncEvent::Deleted { id },
                Err(e) => {
                    tracing::warn!(task_id = %id, error = %e, "delete task failed");
                    SyncEvent::DeleteFailed { id }
                }
            },
            SyncCommand::Shutdown => break,
        };

        if evt_tx.send(event).await.is_err() {
            // UI side went away; nothing left to report to.
            break;
        }
    }

    tracing::debug!("sync worker stopped");
}

async fn fetch_all(client: &ApiClient) -> SyncEvent {
    match client.fetch_all().await {
        Ok(api_tasks) => SyncEvent::Loaded(api_tasks.into_iter().map(Task::from_api).collect()),
        Err(e) => {
            tracing::warn!(error = %e, "task list fetch failed");
            SyncEvent::LoadFailed
        }
    }
}
