//! In-memory task state for the `TaskFlow` session.
//!
//! The [`TaskStore`] owns the authoritative task sequence between API calls,
//! plus the pending-IO markers (initial-load gate, per-task updating flag)
//! and the draft inputs for the add form. It is deliberately synchronous and
//! free of any HTTP or rendering concern so tests can drive and inspect it
//! directly.

pub mod tasks;

pub use tasks::{Task, TaskStore};

use taskflow_proto::TaskId;
use thiserror::Error;

/// Errors that can occur when applying a confirmed mutation to the store.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// Task with the given ID is not in the sequence.
    ///
    /// Reachable when a confirmation arrives for a task the user deleted
    /// while the request was in flight; callers log and move on.
    #[error("task not found: {0}")]
    NotFound(TaskId),
}
