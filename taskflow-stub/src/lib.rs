//! In-memory tasks API stub for `TaskFlow`.
//!
//! Implements the client's HTTP contract over an in-memory store:
//!
//! - `GET    /api/tasks/user_id/{user_id}` — list a user's tasks
//! - `POST   /api/tasks/`                  — create, returns the stored task
//! - `PUT    /api/tasks/id/{id}`           — full replacement of mutable fields
//! - `DELETE /api/tasks/id/{id}`           — remove
//!
//! Used in-process by integration tests (bind to `127.0.0.1:0`) and runnable
//! standalone for manual poking. [`StubState::set_fail`] flips every handler
//! to `500 Internal Server Error` so client failure paths can be exercised;
//! [`StubState::hits`] counts handled requests so tests can assert that a
//! guarded client action issued no request at all.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use chrono::Utc;
use parking_lot::Mutex;

use taskflow_proto::{ApiTask, TaskId, TaskWrite};

/// A task plus the user it belongs to (the read shape omits `user_id`).
#[derive(Debug, Clone)]
struct StoredTask {
    user_id: String,
    task: ApiTask,
}

/// Shared stub server state.
///
/// Insertion order is preserved so `GET` returns tasks oldest-first, the
/// way the client expects to render them.
#[derive(Debug, Default)]
pub struct StubState {
    tasks: Mutex<Vec<StoredTask>>,
    next_id: AtomicU64,
    fail: AtomicBool,
    hits: AtomicU64,
}

impl StubState {
    /// Creates an empty stub state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// When `fail` is true, every subsequent request returns HTTP 500.
    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Number of requests handled so far (including failed ones).
    #[must_use]
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::SeqCst)
    }

    /// Seeds a task directly into the store, bypassing HTTP.
    pub fn seed(&self, user_id: &str, task: ApiTask) {
        self.tasks.lock().push(StoredTask {
            user_id: user_id.to_string(),
            task,
        });
    }

    /// Snapshot of a user's tasks in insertion order.
    #[must_use]
    pub fn tasks_for(&self, user_id: &str) -> Vec<ApiTask> {
        self.tasks
            .lock()
            .iter()
            .filter(|s| s.user_id == user_id)
            .map(|s| s.task.clone())
            .collect()
    }

    fn record_hit(&self) -> bool {
        self.hits.fetch_add(1, Ordering::SeqCst);
        self.fail.load(Ordering::SeqCst)
    }

    fn allocate_id(&self) -> TaskId {
        TaskId::from(format!("{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1))
    }
}

/// Builds the stub router over the given state.
pub fn router(state: Arc<StubState>) -> axum::Router {
    axum::Router::new()
        .route("/api/tasks/user_id/{user_id}", get(list_tasks))
        .route("/api/tasks/", post(create_task))
        .route("/api/tasks/id/{id}", axum::routing::put(update_task).delete(delete_task))
        .with_state(state)
}

/// Starts the stub server with a pre-built [`StubState`].
///
/// Binds to `addr` (use `127.0.0.1:0` in tests for an OS-assigned port) and
/// serves in a spawned task. Returns the bound address and the join handle.
///
/// # Errors
///
/// Returns an error if the TCP listener cannot bind to the given address.
pub async fn start_server_with_state(
    addr: &str,
    state: Arc<StubState>,
) -> Result<(SocketAddr, tokio::task::JoinHandle<()>), Box<dyn std::error::Error + Send + Sync>> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let bound_addr = listener.local_addr()?;

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "stub server error");
        }
    });

    Ok((bound_addr, handle))
}

async fn list_tasks(
    State(state): State<Arc<StubState>>,
    Path(user_id): Path<String>,
) -> impl IntoResponse {
    if state.record_hit() {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    tracing::debug!(%user_id, "list tasks");
    Json(state.tasks_for(&user_id)).into_response()
}

async fn create_task(
    State(state): State<Arc<StubState>>,
    Json(body): Json<TaskWrite>,
) -> impl IntoResponse {
    if state.record_hit() {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    let task = ApiTask {
        id: state.allocate_id(),
        task_name: body.task_name,
        task_desc: body.task_desc,
        status: body.status,
        created_at: Utc::now().to_rfc3339(),
    };
    tracing::debug!(id = %task.id, user_id = %body.user_id, "create task");
    state.seed(&body.user_id, task.clone());
    (StatusCode::CREATED, Json(task)).into_response()
}

async fn update_task(
    State(state): State<Arc<StubState>>,
    Path(id): Path<String>,
    Json(body): Json<TaskWrite>,
) -> impl IntoResponse {
    if state.record_hit() {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    let mut tasks = state.tasks.lock();
    let Some(stored) = tasks.iter_mut().find(|s| s.task.id.as_str() == id) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    tracing::debug!(%id, "update task");
    stored.task.task_name = body.task_name;
    stored.task.task_desc = body.task_desc;
    stored.task.status = body.status;
    let task = stored.task.clone();
    drop(tasks);
    Json(task).into_response()
}

async fn delete_task(
    State(state): State<Arc<StubState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    if state.record_hit() {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    let mut tasks = state.tasks.lock();
    let before = tasks.len();
    tasks.retain(|s| s.task.id.as_str() != id);
    let removed = tasks.len() < before;
    drop(tasks);
    tracing::debug!(%id, removed, "delete task");
    if removed {
        StatusCode::OK.into_response()
    } else {
        StatusCode::NOT_FOUND.into_response()
    }
}
