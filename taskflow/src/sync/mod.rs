//! Remote synchronization for the `TaskFlow` store.
//!
//! Two halves: [`ApiClient`] translates store operations into HTTP calls
//! against the tasks API, and the worker ([`spawn_sync`]) bridges the
//! synchronous TUI event loop to async I/O via [`SyncCommand`] /
//! [`SyncEvent`] mpsc channels.
//!
//! No retries, no backoff, no caching. Every call either resolves with a
//! normalized task-shaped result or fails with a [`SyncError`]; transport
//! errors and non-2xx statuses are surfaced identically to the store as a
//! failed action.

pub mod client;
pub mod worker;

pub use client::{ApiClient, SyncError};
pub use worker::{SyncCommand, SyncConfig, SyncEvent, spawn_sync};
