//! Application state and event handling.
//!
//! [`App`] owns the [`TaskStore`] plus pure view state (focus, cursor,
//! selection, inline edit draft, transient alert). Key handling returns the
//! [`SyncCommand`] to dispatch, if any; confirmed outcomes come back through
//! [`App::apply_event`]. No HTTP and no rendering happens here.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use taskflow_proto::TaskId;

use crate::config::ClientConfig;
use crate::store::{Task, TaskStore};
use crate::sync::{SyncCommand, SyncEvent};

/// Which part of the view is currently focused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// Name input of the add form (default).
    NameInput,
    /// Description input of the add form.
    DescInput,
    /// The task list.
    TaskList,
}

/// Which buffer of the inline editor is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditField {
    /// The name buffer.
    Name,
    /// The description buffer.
    Description,
}

/// In-progress inline edit of one task row.
#[derive(Debug, Clone)]
pub struct EditDraft {
    /// Task being edited.
    pub id: TaskId,
    /// Edited name buffer.
    pub name: String,
    /// Edited description buffer.
    pub description: String,
    /// Buffer currently receiving input.
    pub field: EditField,
}

/// Severity of a transient alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    /// The action succeeded.
    Success,
    /// The action failed.
    Error,
}

/// A transient status-bar alert accompanying a mutating action.
#[derive(Debug, Clone)]
pub struct Alert {
    /// Message naming the action and its outcome.
    pub text: String,
    /// Severity for styling.
    pub kind: AlertKind,
    /// Event-loop ticks until the alert disappears.
    remaining_ticks: u16,
}

/// Main application state.
pub struct App {
    /// The task sequence and pending-IO flags.
    pub store: TaskStore,
    /// Which part of the view is focused.
    pub focus: Focus,
    /// Cursor position (character index) within the active text buffer.
    pub cursor: usize,
    /// Selected row in the task list.
    pub selected: usize,
    /// Inline edit in progress, if any.
    pub editing: Option<EditDraft>,
    /// Transient alert, if any.
    pub alert: Option<Alert>,
    /// Whether the app should quit.
    pub should_quit: bool,
    /// Timestamp display format (chrono).
    pub timestamp_format: String,
    alert_ttl: u16,
}

impl App {
    /// Creates the application in its initial (loading) state.
    ///
    /// View defaults (alert lifetime, timestamp format) come from
    /// [`ClientConfig::default`] so they live in one place.
    #[must_use]
    pub fn new() -> Self {
        let defaults = ClientConfig::default();
        Self {
            store: TaskStore::new(),
            focus: Focus::NameInput,
            cursor: 0,
            selected: 0,
            editing: None,
            alert: None,
            should_quit: false,
            timestamp_format: defaults.timestamp_format,
            alert_ttl: defaults.alert_ttl_ticks,
        }
    }

    /// Sets how many ticks a transient alert stays visible.
    #[must_use]
    pub const fn with_alert_ttl(mut self, ticks: u16) -> Self {
        self.alert_ttl = ticks;
        self
    }

    /// Sets the timestamp display format.
    #[must_use]
    pub fn with_timestamp_format(mut self, format: String) -> Self {
        self.timestamp_format = format;
        self
    }

    /// The task under the list selection, if any.
    #[must_use]
    pub fn selected_task(&self) -> Option<&Task> {
        self.store.tasks().get(self.selected)
    }

    // -- key handling -------------------------------------------------------

    /// Handles a key event, returning a [`SyncCommand`] when the action
    /// requires a network dispatch.
    pub fn handle_key_event(&mut self, key: KeyEvent) -> Option<SyncCommand> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return None;
        }

        if self.editing.is_some() {
            return self.handle_edit_key(key);
        }

        if key.code == KeyCode::Esc {
            self.should_quit = true;
            return None;
        }

        // The full-screen loading gate swallows everything but quit keys.
        if self.store.is_loading() {
            return None;
        }

        match (key.code, key.modifiers) {
            (KeyCode::Tab, KeyModifiers::SHIFT) | (KeyCode::BackTab, _) => {
                self.cycle_focus_backward();
                None
            }
            (KeyCode::Tab, _) => {
                self.cycle_focus_forward();
                None
            }
            _ => match self.focus {
                Focus::NameInput | Focus::DescInput => self.handle_form_key(key),
                Focus::TaskList => self.handle_list_key(key),
            },
        }
    }

    /// Handles a key event while the add form is focused.
    fn handle_form_key(&mut self, key: KeyEvent) -> Option<SyncCommand> {
        match key.code {
            KeyCode::Enter => {
                // Shift+Enter inserts a newline in the description; plain
                // Enter submits from either field.
                if self.focus == Focus::DescInput && key.modifiers.contains(KeyModifiers::SHIFT) {
                    self.insert_char('\n');
                    None
                } else {
                    self.submit_add()
                }
            }
            KeyCode::Char(c) => {
                self.insert_char(c);
                None
            }
            KeyCode::Backspace => {
                self.delete_char();
                None
            }
            KeyCode::Left => {
                self.move_cursor_left();
                None
            }
            KeyCode::Right => {
                self.move_cursor_right();
                None
            }
            KeyCode::Home => {
                self.cursor = 0;
                None
            }
            KeyCode::End => {
                self.cursor = self.active_buffer().chars().count();
                None
            }
            _ => None,
        }
    }

    /// Handles a key event while the task list is focused.
    fn handle_list_key(&mut self, key: KeyEvent) -> Option<SyncCommand> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected + 1 < self.store.len() {
                    self.selected += 1;
                }
                None
            }
            KeyCode::Char(' ') => self.toggle_selected(),
            KeyCode::Char('d') | KeyCode::Delete => self.delete_selected(),
            KeyCode::Char('r') => Some(SyncCommand::FetchAll),
            KeyCode::Enter | KeyCode::Char('e') => {
                self.start_edit();
                None
            }
            _ => None,
        }
    }

    /// Handles a key event while an inline edit is in progress.
    fn handle_edit_key(&mut self, key: KeyEvent) -> Option<SyncCommand> {
        match key.code {
            KeyCode::Esc => {
                // Cancel restores the pre-edit values by discarding the draft.
                self.editing = None;
                self.cursor = 0;
                None
            }
            KeyCode::Tab | KeyCode::BackTab => {
                self.switch_edit_field();
                None
            }
            KeyCode::Enter => {
                if let Some(draft) = &self.editing
                    && draft.field == EditField::Description
                    && key.modifiers.contains(KeyModifiers::SHIFT)
                {
                    self.insert_char('\n');
                    return None;
                }
                self.save_edit()
            }
            KeyCode::Char(c) => {
                self.insert_char(c);
                None
            }
            KeyCode::Backspace => {
                self.delete_char();
                None
            }
            KeyCode::Left => {
                self.move_cursor_left();
                None
            }
            KeyCode::Right => {
                self.move_cursor_right();
                None
            }
            KeyCode::Home => {
                self.cursor = 0;
                None
            }
            KeyCode::End => {
                self.cursor = self.active_buffer().chars().count();
                None
            }
            _ => None,
        }
    }

    // -- intents ------------------------------------------------------------

    /// Submits the add form. A blank name is a silent no-op: no state
    /// change and no request.
    fn submit_add(&mut self) -> Option<SyncCommand> {
        let (name, description) = self.store.draft()?;
        Some(SyncCommand::Create { name, description })
    }

    /// Toggles the selected task's completion, server-first.
    fn toggle_selected(&mut self) -> Option<SyncCommand> {
        let task = self.selected_task()?.clone();
        self.store.begin_update(&task.id);
        Some(SyncCommand::Toggle {
            id: task.id,
            name: task.name,
            description: task.description,
            completed: !task.completed,
        })
    }

    /// Optimistically removes the selected task and requests the delete.
    fn delete_selected(&mut self) -> Option<SyncCommand> {
        let id = self.selected_task()?.id.clone();
        if !self.store.remove(&id) {
            return None;
        }
        self.selected = self.selected.min(self.store.len().saturating_sub(1));
        Some(SyncCommand::Delete { id })
    }

    /// Opens the inline editor for the selected task.
    fn start_edit(&mut self) {
        let Some(task) = self.selected_task().cloned() else {
            return;
        };
        self.cursor = task.name.chars().count();
        self.editing = Some(EditDraft {
            id: task.id,
            name: task.name,
            description: task.description,
            field: EditField::Name,
        });
    }

    /// Saves the inline edit. A blank name is rejected client-side: the
    /// editor stays open and no request is issued.
    fn save_edit(&mut self) -> Option<SyncCommand> {
        let draft = self.editing.as_ref()?;
        if draft.name.trim().is_empty() {
            return None;
        }
        let Some(task) = self.store.get(&draft.id) else {
            // Task vanished while editing (e.g. deleted elsewhere); drop
            // the draft rather than writing to a ghost id.
            self.editing = None;
            return None;
        };
        let completed = task.completed;
        let draft = self.editing.take()?;
        self.cursor = 0;
        self.store.begin_update(&draft.id);
        Some(SyncCommand::Update {
            id: draft.id,
            name: draft.name,
            description: draft.description,
            completed,
        })
    }

    // -- event application --------------------------------------------------

    /// Applies a sync worker event to the store and view state.
    pub fn apply_event(&mut self, event: SyncEvent) {
        match event {
            SyncEvent::Loaded(tasks) => {
                self.store.finish_load(tasks);
                self.selected = 0;
            }
            SyncEvent::LoadFailed => {
                // Logged by the worker; the UI stays interactive with an
                // empty list and no alert.
                self.store.fail_load();
            }
            SyncEvent::Created(task) => {
                self.store.apply_created(task);
                self.cursor = 0;
                self.set_alert("Task added", AlertKind::Success);
            }
            SyncEvent::CreateFailed => {
                self.set_alert("Add task failed", AlertKind::Error);
            }
            SyncEvent::Updated {
                id,
                name,
                description,
            } => {
                self.store.clear_updating(&id);
                match self.store.apply_update(&id, name, description) {
                    Ok(()) => self.set_alert("Task updated", AlertKind::Success),
                    Err(e) => tracing::warn!(error = %e, "stale update confirmation"),
                }
            }
            SyncEvent::UpdateFailed { id } => {
                self.store.clear_updating(&id);
                self.set_alert("Update task failed", AlertKind::Error);
            }
            SyncEvent::Toggled { id, completed } => {
                self.store.clear_updating(&id);
                match self.store.apply_completed(&id, completed) {
                    Ok(()) => {
                        let text = if completed {
                            "Task marked complete"
                        } else {
                            "Task marked incomplete"
                        };
                        self.set_alert(text, AlertKind::Success);
                    }
                    Err(e) => tracing::warn!(error = %e, "stale toggle confirmation"),
                }
            }
            SyncEvent::ToggleFailed { id } => {
                self.store.clear_updating(&id);
                self.set_alert("Toggle task failed", AlertKind::Error);
            }
            SyncEvent::Deleted { id } => {
                self.store.confirm_delete(&id);
                self.set_alert("Task deleted", AlertKind::Success);
            }
            SyncEvent::DeleteFailed { id } => {
                if self.store.rollback_delete(&id) {
                    self.selected = self.selected.min(self.store.len().saturating_sub(1));
                }
                self.set_alert("Delete task failed", AlertKind::Error);
            }
        }
    }

    /// Ticks the transient alert's lifetime; called once per event loop.
    pub fn tick_alert(&mut self) {
        if let Some(alert) = &mut self.alert {
            alert.remaining_ticks = alert.remaining_ticks.saturating_sub(1);
            if alert.remaining_ticks == 0 {
                self.alert = None;
            }
        }
    }

    fn set_alert(&mut self, text: &str, kind: AlertKind) {
        self.alert = Some(Alert {
            text: text.to_string(),
            kind,
            remaining_ticks: self.alert_ttl,
        });
    }

    // -- focus and text editing ---------------------------------------------

    /// Cycle focus forward: Name -> Description -> List -> Name.
    fn cycle_focus_forward(&mut self) {
        self.focus = match self.focus {
            Focus::NameInput => Focus::DescInput,
            Focus::DescInput => Focus::TaskList,
            Focus::TaskList => Focus::NameInput,
        };
        self.reset_cursor_to_end();
    }

    /// Cycle focus backward: Name -> List -> Description -> Name.
    fn cycle_focus_backward(&mut self) {
        self.focus = match self.focus {
            Focus::NameInput => Focus::TaskList,
            Focus::TaskList => Focus::DescInput,
            Focus::DescInput => Focus::NameInput,
        };
        self.reset_cursor_to_end();
    }

    fn switch_edit_field(&mut self) {
        if let Some(draft) = &mut self.editing {
            draft.field = match draft.field {
                EditField::Name => EditField::Description,
                EditField::Description => EditField::Name,
            };
        }
        self.reset_cursor_to_end();
    }

    fn reset_cursor_to_end(&mut self) {
        self.cursor = self.active_buffer().chars().count();
    }

    /// The text buffer that currently receives input.
    #[must_use]
    pub fn active_buffer(&self) -> &str {
        if let Some(draft) = &self.editing {
            return match draft.field {
                EditField::Name => &draft.name,
                EditField::Description => &draft.description,
            };
        }
        match self.focus {
            Focus::NameInput => &self.store.draft_name,
            Focus::DescInput => &self.store.draft_description,
            Focus::TaskList => "",
        }
    }

    fn active_buffer_mut(&mut self) -> Option<&mut String> {
        if let Some(draft) = &mut self.editing {
            return Some(match draft.field {
                EditField::Name => &mut draft.name,
                EditField::Description => &mut draft.description,
            });
        }
        match self.focus {
            Focus::NameInput => Some(&mut self.store.draft_name),
            Focus::DescInput => Some(&mut self.store.draft_description),
            Focus::TaskList => None,
        }
    }

    /// Insert a character at the cursor position (character index).
    fn insert_char(&mut self, c: char) {
        let cursor = self.cursor;
        let Some(buffer) = self.active_buffer_mut() else {
            return;
        };
        let at = byte_index(buffer, cursor);
        buffer.insert(at, c);
        self.cursor += 1;
    }

    /// Delete the character before the cursor.
    fn delete_char(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let cursor = self.cursor;
        let Some(buffer) = self.active_buffer_mut() else {
            return;
        };
        let from = byte_index(buffer, cursor - 1);
        let to = byte_index(buffer, cursor);
        buffer.replace_range(from..to, "");
        self.cursor -= 1;
    }

    /// Move cursor left.
    const fn move_cursor_left(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    /// Move cursor right.
    fn move_cursor_right(&mut self) {
        if self.cursor < self.active_buffer().chars().count() {
            self.cursor += 1;
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Byte offset of the `char_idx`-th character, clamped to the end.
fn byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .map(|(i, _)| i)
        .nth(char_idx)
        .unwrap_or(s.len())
}
