//! Authoritative in-memory task store.
//!
//! # Responsibility
//! - Own the ordered task collection and enforce mutation invariants.
//! - Persist the whole collection after every accepted state change.
//!
//! # Invariants
//! - Mutations are all-or-nothing; a failed validation changes nothing.
//! - Persistence failure never rolls back or blocks a mutation; it is
//!   reported out-of-band through `save_error`.
//! - Ids are unique within the collection.

use crate::model::task::{Priority, Task, TaskId, TaskValidationError};
use crate::storage::adapter::TaskStorage;
use crate::storage::backend::StorageBackend;
use crate::store::query::{visible_tasks, TaskFilter};
use log::debug;

/// Derived task counts; computed on demand, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
}

/// Partial update for an existing task; absent fields stay unchanged.
///
/// `priority` carries raw input and is normalized on apply, same as create.
#[derive(Debug, Clone, Default)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub priority: Option<String>,
}

/// In-memory task collection with persistence-on-mutation.
///
/// Owned and injected by whoever runs the session; there is no ambient
/// singleton. Load once at startup, drop at session end.
pub struct TaskStore<B: StorageBackend> {
    tasks: Vec<Task>,
    storage: TaskStorage<B>,
    storage_error: Option<String>,
    save_error: Option<String>,
}

impl<B: StorageBackend> TaskStore<B> {
    /// Builds a store from whatever the slot currently holds.
    ///
    /// Never fails: a corrupt or unreachable slot yields an empty store
    /// with the advisory exposed through [`TaskStore::storage_error`].
    pub fn load(storage: TaskStorage<B>) -> Self {
        let loaded = storage.load();
        Self {
            tasks: loaded.tasks,
            storage,
            storage_error: loaded.error.map(|err| err.to_string()),
            save_error: None,
        }
    }

    /// Ordered task collection, newest-created first.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Advisory from the initial load, if any. Non-fatal.
    pub fn storage_error(&self) -> Option<&str> {
        self.storage_error.as_deref()
    }

    /// Advisory from the most recent save attempt, if it failed. Non-fatal.
    pub fn save_error(&self) -> Option<&str> {
        self.save_error.as_deref()
    }

    /// Creates a task and prepends it to the collection.
    ///
    /// # Errors
    /// Rejects a title that trims to empty; the collection is unchanged.
    pub fn create(&mut self, title: &str, priority: &str) -> Result<TaskId, TaskValidationError> {
        let task = Task::new(title, priority)?;
        let id = task.id.clone();
        self.tasks.insert(0, task);
        debug!(
            "event=task_create module=store status=ok total={}",
            self.tasks.len()
        );
        self.persist();
        Ok(id)
    }

    /// Flips completion state; silent no-op for an unknown id.
    pub fn toggle(&mut self, id: &str) {
        if let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) {
            task.completed = !task.completed;
            debug!(
                "event=task_toggle module=store status=ok completed={}",
                task.completed
            );
            self.persist();
        }
    }

    /// Applies the provided fields to the matching task.
    ///
    /// Title is trimmed and priority normalized exactly as in create.
    ///
    /// # Errors
    /// Rejects an update whose title trims to empty before touching any
    /// state. An unknown id is a silent no-op.
    pub fn update(&mut self, id: &str, update: TaskUpdate) -> Result<(), TaskValidationError> {
        if let Some(title) = update.title.as_deref() {
            if title.trim().is_empty() {
                return Err(TaskValidationError::EmptyTitle);
            }
        }

        let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) else {
            return Ok(());
        };

        if let Some(title) = update.title.as_deref() {
            task.title = title.trim().to_string();
        }
        if let Some(priority) = update.priority.as_deref() {
            task.priority = Priority::normalize(priority);
        }
        debug!("event=task_update module=store status=ok");
        self.persist();
        Ok(())
    }

    /// Removes the matching task; silent no-op for an unknown id.
    ///
    /// Runs unconditionally; any confirmation step lives with the caller.
    pub fn delete(&mut self, id: &str) {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        if self.tasks.len() != before {
            debug!(
                "event=task_delete module=store status=ok total={}",
                self.tasks.len()
            );
            self.persist();
        }
    }

    /// Derives current counts; `active + completed == total` always holds.
    pub fn summary(&self) -> Summary {
        let total = self.tasks.len();
        let completed = self.tasks.iter().filter(|task| task.completed).count();
        Summary {
            total,
            active: total - completed,
            completed,
        }
    }

    /// Tasks passing `filter` and a case-insensitive title `search`.
    pub fn filtered(&self, filter: TaskFilter, search: &str) -> Vec<&Task> {
        visible_tasks(&self.tasks, filter, search)
    }

    fn persist(&mut self) {
        self.save_error = match self.storage.save(&self.tasks) {
            Ok(()) => None,
            Err(err) => Some(err.to_string()),
        };
    }
}
