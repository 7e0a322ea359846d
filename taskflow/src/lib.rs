//! `TaskFlow` — terminal task-management client library.

pub mod app;
pub mod config;
pub mod store;
pub mod sync;
pub mod ui;
