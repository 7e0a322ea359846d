//! Shared wire definitions for the `TaskFlow` tasks API.

pub mod task;

pub use task::{ApiTask, TaskId, TaskWrite};
