//! The task sequence and its mutation rules.
//!
//! Mutations follow a two-phase shape dictated by the remote API: the UI
//! marks intent (draft validation, updating marker, optimistic removal), the
//! sync worker performs the HTTP call, and the confirmed outcome is applied
//! back here (`apply_created`, `apply_update`, `apply_completed`,
//! `confirm_delete` / `rollback_delete`).

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use taskflow_proto::{ApiTask, TaskId};

use super::StoreError;

/// A task as the client sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// Unique identifier within the session.
    pub id: TaskId,
    /// Non-empty display name.
    pub name: String,
    /// Free-form description, possibly empty.
    pub description: String,
    /// Completion flag.
    pub completed: bool,
    /// Creation time. Display-only; never sent back to the API on update.
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Converts a wire task into the client shape.
    ///
    /// An unparseable `created_at` falls back to the current time — the
    /// field is display-only, so a bad server timestamp should not fail
    /// the whole fetch.
    #[must_use]
    pub fn from_api(api: ApiTask) -> Self {
        let created_at = api.created_at_utc().unwrap_or_else(Utc::now);
        Self {
            id: api.id,
            name: api.task_name,
            description: api.task_desc,
            completed: api.status,
            created_at,
        }
    }
}

/// The in-memory authoritative task sequence for the current session.
///
/// Insertion-ordered and append-only; delete is the only operation that
/// changes relative order of the survivors (it doesn't — it only removes).
#[derive(Debug)]
pub struct TaskStore {
    tasks: Vec<Task>,
    /// True while the initial fetch is outstanding; gates the whole view.
    loading: bool,
    /// Task with a mutation request currently in flight, if any.
    updating: Option<TaskId>,
    /// Optimistically removed tasks awaiting DELETE confirmation, keyed by
    /// id, with the index they were removed from for rollback.
    pending_deletes: HashMap<TaskId, (usize, Task)>,
    /// Draft name for the add form.
    pub draft_name: String,
    /// Draft description for the add form.
    pub draft_description: String,
}

impl TaskStore {
    /// Creates an empty store with the initial-load gate raised.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            loading: true,
            updating: None,
            pending_deletes: HashMap::new(),
            draft_name: String::new(),
            draft_description: String::new(),
        }
    }

    // -- sequence access ----------------------------------------------------

    /// The current task sequence, oldest first.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Number of tasks in the sequence.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the sequence is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Number of completed tasks.
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.completed).count()
    }

    /// Looks up a task by id.
    #[must_use]
    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    // -- initial load -------------------------------------------------------

    /// Whether the initial fetch is still outstanding.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Populates the sequence from the initial fetch and drops the gate.
    pub fn finish_load(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
        self.loading = false;
    }

    /// Drops the load gate without populating; the sequence is left as-is
    /// and the UI stays interactive (a failed fetch is logged, not
    /// alerted).
    pub fn fail_load(&mut self) {
        self.loading = false;
    }

    // -- add ----------------------------------------------------------------

    /// Returns the draft (name, description) if the name is non-blank.
    ///
    /// A blank or whitespace-only name yields `None`: no state change, and
    /// the caller must not issue a request. The drafts are not cleared here —
    /// they clear on confirmed create, so a failed add leaves them intact
    /// for retry.
    #[must_use]
    pub fn draft(&self) -> Option<(String, String)> {
        if self.draft_name.trim().is_empty() {
            return None;
        }
        Some((self.draft_name.clone(), self.draft_description.clone()))
    }

    /// Appends a server-confirmed task and clears the draft inputs.
    pub fn apply_created(&mut self, task: Task) {
        self.tasks.push(task);
        self.draft_name.clear();
        self.draft_description.clear();
    }

    // -- updating marker ----------------------------------------------------

    /// Marks a task as having a mutation in flight.
    pub fn begin_update(&mut self, id: &TaskId) {
        self.updating = Some(id.clone());
    }

    /// Clears the updating marker if it belongs to `id`.
    pub fn clear_updating(&mut self, id: &TaskId) {
        if self.updating.as_ref() == Some(id) {
            self.updating = None;
        }
    }

    /// Whether the given task has a mutation in flight.
    #[must_use]
    pub fn is_updating(&self, id: &TaskId) -> bool {
        self.updating.as_ref() == Some(id)
    }

    // -- update / toggle ----------------------------------------------------

    /// Replaces a task's name and description in place.
    ///
    /// `id`, `completed`, and `created_at` are untouched.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if `id` is not in the sequence.
    pub fn apply_update(
        &mut self,
        id: &TaskId,
        name: String,
        description: String,
    ) -> Result<(), StoreError> {
        let task = self.get_mut(id)?;
        task.name = name;
        task.description = description;
        Ok(())
    }

    /// Sets a task's completion flag to the server-confirmed value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if `id` is not in the sequence.
    pub fn apply_completed(&mut self, id: &TaskId, completed: bool) -> Result<(), StoreError> {
        let task = self.get_mut(id)?;
        task.completed = completed;
        Ok(())
    }

    // -- delete -------------------------------------------------------------

    /// Optimistically removes a task, remembering its position for rollback.
    ///
    /// Returns `false` (and changes nothing) if `id` is not in the sequence.
    pub fn remove(&mut self, id: &TaskId) -> bool {
        let Some(index) = self.tasks.iter().position(|t| &t.id == id) else {
            return false;
        };
        let task = self.tasks.remove(index);
        self.pending_deletes.insert(id.clone(), (index, task));
        true
    }

    /// Drops the rollback entry after the DELETE was confirmed.
    pub fn confirm_delete(&mut self, id: &TaskId) {
        self.pending_deletes.remove(id);
    }

    /// Reinserts an optimistically removed task after its DELETE failed.
    ///
    /// The task returns to its original position (clamped to the current
    /// sequence length). Returns `false` if there is no pending delete for
    /// `id`.
    pub fn rollback_delete(&mut self, id: &TaskId) -> bool {
        let Some((index, task)) = self.pending_deletes.remove(id) else {
            return false;
        };
        let index = index.min(self.tasks.len());
        self.tasks.insert(index, task);
        true
    }

    fn get_mut(&mut self, id: &TaskId) -> Result<&mut Task, StoreError> {
        self.tasks
            .iter_mut()
            .find(|t| &t.id == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}
