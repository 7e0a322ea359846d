//! Integration tests for the Remote Sync Adapter against the stub API.
//!
//! Verifies the HTTP contract end to end: CRUD round trips, user scoping
//! on reads, and that server failures and unreachable hosts both surface
//! as `SyncError`.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use taskflow::sync::{ApiClient, SyncError};
use taskflow_proto::{ApiTask, TaskId};
use taskflow_stub::{StubState, start_server_with_state};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Spawns an in-process stub server on an OS-assigned port.
async fn spawn_stub() -> (Arc<StubState>, String) {
    let state = Arc::new(StubState::new());
    let (addr, _handle) = start_server_with_state("127.0.0.1:0", Arc::clone(&state))
        .await
        .expect("failed to start stub server");
    (state, format!("http://{addr}"))
}

fn make_client(base_url: &str) -> ApiClient {
    ApiClient::new(base_url, "user-1", Duration::from_secs(5)).expect("client should build")
}

fn make_api_task(id: &str, name: &str) -> ApiTask {
    ApiTask {
        id: TaskId::from(id),
        task_name: name.to_string(),
        task_desc: String::new(),
        status: false,
        created_at: "2026-03-14T09:26:53Z".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Fetch
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetch_all_empty() {
    let (_state, base) = spawn_stub().await;
    let client = make_client(&base);

    let tasks = client.fetch_all().await.unwrap();
    assert!(tasks.is_empty());
}

#[tokio::test]
async fn fetch_all_returns_only_own_tasks_in_insertion_order() {
    let (state, base) = spawn_stub().await;
    state.seed("user-1", make_api_task("1", "first"));
    state.seed("someone-else", make_api_task("2", "not mine"));
    state.seed("user-1", make_api_task("3", "second"));

    let client = make_client(&base);
    let tasks = client.fetch_all().await.unwrap();

    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].task_name, "first");
    assert_eq!(tasks[1].task_name, "second");
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_returns_server_assigned_id_and_timestamp() {
    let (_state, base) = spawn_stub().await;
    let client = make_client(&base);

    let created = client.create("Buy milk", "Semi-skimmed").await.unwrap();
    assert_eq!(created.id.as_str(), "1");
    assert_eq!(created.task_name, "Buy milk");
    assert_eq!(created.task_desc, "Semi-skimmed");
    assert!(!created.status);
    assert!(created.created_at_utc().is_some());
}

#[tokio::test]
async fn create_persists_under_configured_user() {
    let (state, base) = spawn_stub().await;
    let client = make_client(&base);

    client.create("Buy milk", "").await.unwrap();

    let stored = state.tasks_for("user-1");
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].task_name, "Buy milk");
}

#[tokio::test]
async fn created_ids_are_unique() {
    let (_state, base) = spawn_stub().await;
    let client = make_client(&base);

    let a = client.create("A", "").await.unwrap();
    let b = client.create("B", "").await.unwrap();
    assert_ne!(a.id, b.id);
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[tokio::test]
async fn update_replaces_all_mutable_fields() {
    let (state, base) = spawn_stub().await;
    let client = make_client(&base);
    let created = client.create("old name", "old desc").await.unwrap();

    client
        .update(&created.id, "new name", "new desc", true)
        .await
        .unwrap();

    let stored = state.tasks_for("user-1");
    assert_eq!(stored[0].task_name, "new name");
    assert_eq!(stored[0].task_desc, "new desc");
    assert!(stored[0].status);
    // The server keeps its own creation timestamp.
    assert_eq!(stored[0].created_at, created.created_at);
}

#[tokio::test]
async fn update_unknown_id_is_status_error() {
    let (_state, base) = spawn_stub().await;
    let client = make_client(&base);

    let err = client
        .update(&TaskId::from("999"), "n", "d", false)
        .await
        .unwrap_err();
    assert!(matches!(err, SyncError::Status(s) if s.as_u16() == 404));
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_removes_the_task() {
    let (state, base) = spawn_stub().await;
    let client = make_client(&base);
    let created = client.create("doomed", "").await.unwrap();

    client.delete(&created.id).await.unwrap();
    assert!(state.tasks_for("user-1").is_empty());
}

#[tokio::test]
async fn delete_unknown_id_is_status_error() {
    let (_state, base) = spawn_stub().await;
    let client = make_client(&base);

    let err = client.delete(&TaskId::from("999")).await.unwrap_err();
    assert!(matches!(err, SyncError::Status(s) if s.as_u16() == 404));
}

// ---------------------------------------------------------------------------
// Failure surfacing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn server_failure_surfaces_on_every_verb() {
    let (state, base) = spawn_stub().await;
    let client = make_client(&base);
    let created = client.create("victim", "").await.unwrap();

    state.set_fail(true);

    assert!(client.fetch_all().await.is_err());
    assert!(client.create("x", "").await.is_err());
    assert!(client.update(&created.id, "x", "", false).await.is_err());
    assert!(client.delete(&created.id).await.is_err());

    state.set_fail(false);
    assert_eq!(client.fetch_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn unreachable_server_is_transport_error() {
    // Port 1 is essentially guaranteed to refuse connections.
    let client = ApiClient::new("http://127.0.0.1:1", "user-1", Duration::from_secs(1))
        .expect("client should build");

    let err = client.fetch_all().await.unwrap_err();
    assert!(matches!(err, SyncError::Transport(_)));
}
