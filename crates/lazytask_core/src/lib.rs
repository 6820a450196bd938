//! Core domain logic for LazyTask.
//! This crate is the single source of truth for task-list invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod storage;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::task::{Priority, Task, TaskId, TaskValidationError};
pub use storage::adapter::{LoadedTasks, StorageError, StorageResult, TaskStorage, TASKS_KEY};
pub use storage::backend::{BackendError, SqliteBackend, StorageBackend};
pub use store::query::{visible_tasks, TaskFilter};
pub use store::task_store::{Summary, TaskStore, TaskUpdate};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
