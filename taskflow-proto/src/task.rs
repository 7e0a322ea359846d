//! JSON shapes exchanged with the tasks API.
//!
//! The API speaks a snake_case dialect (`task_name`, `task_desc`, `status`)
//! that differs from the client's task model; these types mirror the wire
//! exactly so serde derives stay mechanical. Reads return [`ApiTask`], writes
//! send [`TaskWrite`] (which additionally carries the owning `user_id` —
//! the read shape never includes it).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque task identifier.
///
/// The API assigns ids on create; the client treats them as unique strings
/// and never inspects their structure. [`TaskId::new_local`] produces a
/// UUID v7 id for tasks that exist only locally (e.g. a draft awaiting the
/// server's response), keeping the id space time-ordered and collision-free.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Creates a time-ordered locally-generated identifier (UUID v7).
    #[must_use]
    pub fn new_local() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for TaskId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A task as returned by the API on reads and creates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiTask {
    /// Server-assigned identifier.
    pub id: TaskId,
    /// Display name.
    pub task_name: String,
    /// Free-form description, possibly empty.
    #[serde(default)]
    pub task_desc: String,
    /// Completion flag.
    pub status: bool,
    /// Creation time as an RFC 3339 string.
    pub created_at: String,
}

impl ApiTask {
    /// Parses `created_at` as RFC 3339, in UTC.
    ///
    /// Returns `None` when the server sent something unparseable; callers
    /// substitute the current time rather than failing the whole fetch.
    #[must_use]
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.created_at)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// Request body for `POST /api/tasks/` and `PUT /api/tasks/id/{id}`.
///
/// Both verbs send a full replacement of the mutable fields. `created_at`
/// is deliberately absent: creation time is server-owned and display-only
/// on the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskWrite {
    /// Display name; the client guarantees this is non-blank before sending.
    pub task_name: String,
    /// Owning user, from client configuration.
    pub user_id: String,
    /// Free-form description.
    pub task_desc: String,
    /// Completion flag.
    pub status: bool,
}
