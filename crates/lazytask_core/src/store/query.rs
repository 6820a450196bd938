//! Derived list views over the in-memory collection.
//!
//! # Invariants
//! - Derivations never mutate the collection or hit storage.
//! - Result ordering follows the collection's newest-first order.

use crate::model::task::Task;

/// Completion filter for list views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl TaskFilter {
    fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Active => !task.completed,
            Self::Completed => task.completed,
        }
    }
}

/// Returns tasks passing the filter whose titles contain `search`,
/// trimmed and case-insensitive. A blank search matches everything.
pub fn visible_tasks<'a>(tasks: &'a [Task], filter: TaskFilter, search: &str) -> Vec<&'a Task> {
    let needle = search.trim().to_lowercase();
    tasks
        .iter()
        .filter(|task| filter.matches(task))
        .filter(|task| needle.is_empty() || task.title.to_lowercase().contains(&needle))
        .collect()
}
