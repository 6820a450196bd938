//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical task record and its wire shape.
//! - Provide priority normalization and title validation rules.
//!
//! # Invariants
//! - `id` is stable and never reused for another task.
//! - `title` is non-empty after trimming on every construction path.
//! - `priority` is always one of the three closed tiers.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Stable opaque identifier for a task.
///
/// Kept as a string alias: ids loaded from a foreign payload are preserved
/// verbatim, so the wire form is the canonical form.
pub type TaskId = String;

/// Closed priority tier for a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Normalizes arbitrary user or persisted input to a tier.
    ///
    /// Matching is case-insensitive for all three tiers; anything
    /// unrecognized, including the empty string, lands on `Medium` with the
    /// fallback arm.
    pub fn normalize(input: &str) -> Self {
        match input.to_ascii_lowercase().as_str() {
            "low" => Self::Low,
            "high" => Self::High,
            _ => Self::Medium,
        }
    }

    /// Wire name of this tier.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation failure for task mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Title was empty or whitespace-only after trimming.
    EmptyTitle,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "task title cannot be empty"),
        }
    }
}

impl Error for TaskValidationError {}

/// Canonical task record.
///
/// Serialized field names follow the persisted wire shape, so a full
/// collection round-trips byte-compatibly with earlier payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Stable opaque ID, unique within the collection.
    pub id: TaskId,
    /// Non-empty trimmed display text.
    pub title: String,
    /// Completion flag, flipped only through the store's toggle operation.
    pub completed: bool,
    /// Unix epoch milliseconds, set once at creation.
    #[serde(rename = "createdAt")]
    pub created_at: i64,
    /// Closed tier; unrecognized inputs normalize to `Medium`.
    pub priority: Priority,
}

impl Task {
    /// Creates a task from raw user input with a generated stable ID.
    ///
    /// # Invariants
    /// - `completed` starts as `false`.
    /// - `created_at` is set to the current wall clock.
    ///
    /// # Errors
    /// Returns `TaskValidationError::EmptyTitle` when `title` trims empty.
    pub fn new(title: &str, priority: &str) -> Result<Self, TaskValidationError> {
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return Err(TaskValidationError::EmptyTitle);
        }

        Ok(Self {
            id: generate_id(),
            title: trimmed.to_string(),
            completed: false,
            created_at: now_epoch_ms(),
            priority: Priority::normalize(priority),
        })
    }
}

/// Generates a fresh session-unique task id.
pub(crate) fn generate_id() -> TaskId {
    Uuid::new_v4().to_string()
}

/// Current wall-clock time in Unix epoch milliseconds.
pub(crate) fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0)
}
