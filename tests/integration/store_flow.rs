//! End-to-end flows: key events through the `App`, commands through the
//! sync worker, HTTP against an in-process stub, and confirmations applied
//! back to the store.
//!
//! Covers the client-side contract: fetch-on-start, the blank-name guards
//! (no request is ever issued), the four mutations with success and failure
//! branches, and delete rollback.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent};
use tokio::sync::mpsc;
use tokio::time::timeout;

use taskflow::app::{App, Focus};
use taskflow::sync::{SyncCommand, SyncConfig, SyncEvent, spawn_sync};
use taskflow_proto::{ApiTask, TaskId};
use taskflow_stub::{StubState, start_server_with_state};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

struct Harness {
    state: Arc<StubState>,
    app: App,
    cmd_tx: mpsc::Sender<SyncCommand>,
    evt_rx: mpsc::Receiver<SyncEvent>,
}

/// Spawns a stub plus a sync worker and applies the initial fetch event.
async fn start(seed: Vec<ApiTask>) -> Harness {
    let state = Arc::new(StubState::new());
    for task in seed {
        state.seed("user-1", task);
    }
    let (addr, _handle) = start_server_with_state("127.0.0.1:0", Arc::clone(&state))
        .await
        .expect("failed to start stub server");

    let config = SyncConfig {
        base_url: format!("http://{addr}"),
        user_id: "user-1".to_string(),
        request_timeout: Duration::from_secs(5),
        channel_capacity: 16,
    };
    let (cmd_tx, mut evt_rx) = spawn_sync(&config).expect("worker should spawn");

    let mut app = App::new();
    let initial = recv(&mut evt_rx).await;
    assert!(matches!(initial, SyncEvent::Loaded(_)));
    app.apply_event(initial);

    Harness {
        state,
        app,
        cmd_tx,
        evt_rx,
    }
}

async fn recv(rx: &mut mpsc::Receiver<SyncEvent>) -> SyncEvent {
    timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out waiting for sync event")
        .expect("worker closed event channel")
}

/// Dispatches a key to the app and forwards any resulting command.
async fn press(harness: &mut Harness, code: KeyCode) -> bool {
    match harness.app.handle_key_event(KeyEvent::from(code)) {
        Some(cmd) => {
            harness.cmd_tx.send(cmd).await.expect("worker gone");
            true
        }
        None => false,
    }
}

/// Dispatches one key, then waits for and applies the resulting event.
async fn press_and_sync(harness: &mut Harness, code: KeyCode) {
    assert!(press(harness, code).await, "key produced no command");
    let event = recv(&mut harness.evt_rx).await;
    harness.app.apply_event(event);
}

async fn type_str(harness: &mut Harness, s: &str) {
    for c in s.chars() {
        press(harness, KeyCode::Char(c)).await;
    }
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
// Fetch on start
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetch_on_start_populates_store_in_order() {
    let harness = start(vec![make_api_task("1", "first"), make_api_task("2", "second")]).await;

    assert!(!harness.app.store.is_loading());
    assert_eq!(harness.app.store.len(), 2);
    assert_eq!(harness.app.store.tasks()[0].name, "first");
    assert_eq!(harness.app.store.tasks()[1].name, "second");
}

#[tokio::test]
async fn empty_fetch_is_empty_state_not_error() {
    let harness = start(vec![]).await;
    assert!(!harness.app.store.is_loading());
    assert!(harness.app.store.is_empty());
    assert!(harness.app.alert.is_none());
}

#[tokio::test]
async fn fetch_failure_leaves_empty_interactive_store() {
    let state = Arc::new(StubState::new());
    state.set_fail(true);
    let (addr, _handle) = start_server_with_state("127.0.0.1:0", Arc::clone(&state))
        .await
        .expect("failed to start stub server");

    let config = SyncConfig {
        base_url: format!("http://{addr}"),
        user_id: "user-1".to_string(),
        request_timeout: Duration::from_secs(5),
        channel_capacity: 16,
    };
    let (_cmd_tx, mut evt_rx) = spawn_sync(&config).expect("worker should spawn");

    let mut app = App::new();
    let event = recv(&mut evt_rx).await;
    assert!(matches!(event, SyncEvent::LoadFailed));
    app.apply_event(event);

    assert!(!app.store.is_loading());
    assert!(app.store.is_empty());
    // No user-visible alert for the initial fetch.
    assert!(app.alert.is_none());
}

#[tokio::test]
async fn refresh_picks_up_server_side_changes() {
    let mut harness = start(vec![make_api_task("1", "A")]).await;
    harness.app.focus = Focus::TaskList;

    // Another client added a task since the initial fetch.
    harness.state.seed("user-1", make_api_task("2", "B"));
    press_and_sync(&mut harness, KeyCode::Char('r')).await;

    let names: Vec<&str> = harness
        .app
        .store
        .tasks()
        .iter()
        .map(|t| t.name.as_str())
        .collect();
    assert_eq!(names, ["A", "B"]);
    assert_eq!(harness.app.selected, 0);
}

// ---------------------------------------------------------------------------
// Add
// ---------------------------------------------------------------------------

#[tokio::test]
async fn add_flow_appends_confirmed_task() {
    let mut harness = start(vec![]).await;
    let hits_after_load = harness.state.hits();

    type_str(&mut harness, "Buy milk").await;
    press_and_sync(&mut harness, KeyCode::Enter).await;

    assert_eq!(harness.app.store.len(), 1);
    let task = &harness.app.store.tasks()[0];
    assert_eq!(task.name, "Buy milk");
    assert!(!task.completed);
    assert!(harness.app.store.draft_name.is_empty());
    assert_eq!(harness.state.tasks_for("user-1").len(), 1);
    assert_eq!(harness.state.hits(), hits_after_load + 1);
}

#[tokio::test]
async fn blank_name_add_issues_no_request() {
    let mut harness = start(vec![]).await;
    let hits_after_load = harness.state.hits();

    type_str(&mut harness, "   ").await;
    assert!(!press(&mut harness, KeyCode::Enter).await);

    assert_eq!(harness.app.store.len(), 0);
    assert_eq!(harness.state.hits(), hits_after_load);
}

#[tokio::test]
async fn failed_add_leaves_sequence_untouched() {
    let mut harness = start(vec![]).await;
    harness.state.set_fail(true);

    type_str(&mut harness, "Buy milk").await;
    press_and_sync(&mut harness, KeyCode::Enter).await;

    assert_eq!(harness.app.store.len(), 0);
    // Draft survives for retry.
    assert_eq!(harness.app.store.draft_name, "Buy milk");
    assert!(harness.app.alert.is_some());
}

// ---------------------------------------------------------------------------
// Toggle
// ---------------------------------------------------------------------------

#[tokio::test]
async fn toggle_flow_flips_only_completed() {
    let mut harness = start(vec![make_api_task("1", "Buy milk")]).await;
    harness.app.focus = Focus::TaskList;

    press_and_sync(&mut harness, KeyCode::Char(' ')).await;

    let task = &harness.app.store.tasks()[0];
    assert_eq!(task.id, TaskId::from("1"));
    assert_eq!(task.name, "Buy milk");
    assert!(task.completed);
    assert!(!harness.app.store.is_updating(&TaskId::from("1")));
    // Server agrees.
    assert!(harness.state.tasks_for("user-1")[0].status);
}

#[tokio::test]
async fn toggle_failure_leaves_local_state_unchanged() {
    let mut harness = start(vec![make_api_task("1", "Buy milk")]).await;
    harness.app.focus = Focus::TaskList;
    harness.state.set_fail(true);

    press_and_sync(&mut harness, KeyCode::Char(' ')).await;

    assert!(!harness.app.store.tasks()[0].completed);
    assert!(!harness.app.store.is_updating(&TaskId::from("1")));
    assert!(harness.app.alert.is_some());
}

// ---------------------------------------------------------------------------
// Update (inline edit)
// ---------------------------------------------------------------------------

#[tokio::test]
async fn edit_flow_updates_name_and_description_only() {
    let mut harness = start(vec![make_api_task("1", "Buy milk")]).await;
    harness.app.focus = Focus::TaskList;
    let before = harness.app.store.tasks()[0].clone();

    press(&mut harness, KeyCode::Char('e')).await;
    type_str(&mut harness, " now").await;
    press_and_sync(&mut harness, KeyCode::Enter).await;

    let after = &harness.app.store.tasks()[0];
    assert_eq!(after.name, "Buy milk now");
    assert_eq!(after.id, before.id);
    assert_eq!(after.completed, before.completed);
    assert_eq!(after.created_at, before.created_at);
    assert_eq!(harness.state.tasks_for("user-1")[0].task_name, "Buy milk now");
}

#[tokio::test]
async fn edit_with_blank_name_issues_no_request() {
    let mut harness = start(vec![make_api_task("1", "Buy milk")]).await;
    harness.app.focus = Focus::TaskList;
    let hits_after_load = harness.state.hits();

    press(&mut harness, KeyCode::Char('e')).await;
    for _ in 0.."Buy milk".len() {
        press(&mut harness, KeyCode::Backspace).await;
    }
    assert!(!press(&mut harness, KeyCode::Enter).await);

    assert_eq!(harness.state.hits(), hits_after_load);
    assert_eq!(harness.app.store.tasks()[0].name, "Buy milk");
}

#[tokio::test]
async fn failed_edit_leaves_sequence_unchanged() {
    let mut harness = start(vec![make_api_task("1", "Buy milk")]).await;
    harness.app.focus = Focus::TaskList;
    harness.state.set_fail(true);

    press(&mut harness, KeyCode::Char('e')).await;
    type_str(&mut harness, "!").await;
    press_and_sync(&mut harness, KeyCode::Enter).await;

    assert_eq!(harness.app.store.tasks()[0].name, "Buy milk");
    assert!(!harness.app.store.is_updating(&TaskId::from("1")));
    assert!(harness.app.alert.is_some());
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_flow_removes_exactly_one_task() {
    let mut harness = start(vec![
        make_api_task("1", "A"),
        make_api_task("2", "B"),
        make_api_task("3", "C"),
    ])
    .await;
    harness.app.focus = Focus::TaskList;
    harness.app.selected = 1;

    press_and_sync(&mut harness, KeyCode::Char('d')).await;

    let names: Vec<&str> = harness
        .app
        .store
        .tasks()
        .iter()
        .map(|t| t.name.as_str())
        .collect();
    assert_eq!(names, ["A", "C"]);
    assert_eq!(harness.state.tasks_for("user-1").len(), 2);
}

#[tokio::test]
async fn failed_delete_rolls_back_to_original_position() {
    let mut harness = start(vec![
        make_api_task("1", "A"),
        make_api_task("2", "B"),
        make_api_task("3", "C"),
    ])
    .await;
    harness.app.focus = Focus::TaskList;
    harness.app.selected = 1;
    harness.state.set_fail(true);

    press_and_sync(&mut harness, KeyCode::Char('d')).await;

    let names: Vec<&str> = harness
        .app
        .store
        .tasks()
        .iter()
        .map(|t| t.name.as_str())
        .collect();
    assert_eq!(names, ["A", "B", "C"]);
    // Server never removed it either.
    assert_eq!(harness.state.tasks_for("user-1").len(), 3);
    assert!(harness.app.alert.is_some());
}
