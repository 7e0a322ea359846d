//! HTTP client for the remote tasks API.
//!
//! Pure translation layer: one method per endpoint, each mapping to the
//! wire shapes in `taskflow-proto` and back. The caller decides what a
//! failure means; this layer only reports that the request did not succeed.

use std::time::Duration;

use taskflow_proto::{ApiTask, TaskId, TaskWrite};

/// Errors from the remote sync layer.
///
/// The variants exist for logging; callers treat every variant the same
/// way — the action failed and may be retried by repeating it.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// The request could not be sent or the response body could not be read.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("server returned {0}")]
    Status(reqwest::StatusCode),
}

/// HTTP client bound to one API base URL and one user id.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    user_id: String,
}

impl ApiClient {
    /// Creates a client with the given base URL (no trailing slash), user
    /// id, and per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Transport`] if the underlying HTTP client
    /// cannot be constructed.
    pub fn new(base_url: &str, user_id: &str, timeout: Duration) -> Result<Self, SyncError> {
        let http = reqwest::Client::builder()
            .user_agent("taskflow/0.1")
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            user_id: user_id.to_string(),
        })
    }

    /// The user id this client writes on behalf of.
    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// `GET /api/tasks/user_id/{user_id}` — all tasks for the configured
    /// user, in the server's (insertion) order.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError`] on transport failure, non-2xx status, or an
    /// undecodable response body.
    pub async fn fetch_all(&self) -> Result<Vec<ApiTask>, SyncError> {
        let url = format!("{}/api/tasks/user_id/{}", self.base_url, self.user_id);
        let resp = check_response(self.http.get(&url).send().await?)?;
        Ok(resp.json().await?)
    }

    /// `POST /api/tasks/` — create a task. The response carries the
    /// server-assigned id and timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError`] on transport failure, non-2xx status, or an
    /// undecodable response body.
    pub async fn create(&self, name: &str, description: &str) -> Result<ApiTask, SyncError> {
        let url = format!("{}/api/tasks/", self.base_url);
        let body = TaskWrite {
            task_name: name.to_string(),
            user_id: self.user_id.clone(),
            task_desc: description.to_string(),
            status: false,
        };
        let resp = check_response(self.http.post(&url).json(&body).send().await?)?;
        Ok(resp.json().await?)
    }

    /// `PUT /api/tasks/id/{id}` — full replacement of the mutable fields.
    /// Success is the status code; the response body is unused.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError`] on transport failure or non-2xx status.
    pub async fn update(
        &self,
        id: &TaskId,
        name: &str,
        description: &str,
        completed: bool,
    ) -> Result<(), SyncError> {
        let url = format!("{}/api/tasks/id/{}", self.base_url, id);
        let body = TaskWrite {
            task_name: name.to_string(),
            user_id: self.user_id.clone(),
            task_desc: description.to_string(),
            status: completed,
        };
        check_response(self.http.put(&url).json(&body).send().await?)?;
        Ok(())
    }

    /// `DELETE /api/tasks/id/{id}`.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError`] on transport failure or non-2xx status.
    pub async fn delete(&self, id: &TaskId) -> Result<(), SyncError> {
        let url = format!("{}/api/tasks/id/{}", self.base_url, id);
        check_response(self.http.delete(&url).send().await?)?;
        Ok(())
    }
}

/// Maps a non-success status to [`SyncError::Status`].
fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, SyncError> {
    let status = resp.status();
    if status.is_success() {
        Ok(resp)
    } else {
        Err(SyncError::Status(status))
    }
}
