//! Persistence adapter between the task collection and a key-value slot.
//!
//! # Responsibility
//! - Serialize the whole collection to one fixed, versioned key.
//! - Decode foreign payloads defensively instead of failing the load.
//!
//! # Invariants
//! - `load` never fails: every failure path degrades to an empty collection
//!   plus an advisory error.
//! - Saves are full overwrites of the slot, never incremental.

use crate::model::task::{generate_id, now_epoch_ms, Priority, Task};
use crate::storage::backend::{BackendError, StorageBackend};
use log::{info, warn};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Versioned slot key holding the serialized task collection.
///
/// The version suffix allows a future format migration to read the old key
/// and write a new one.
pub const TASKS_KEY: &str = "lazytask.todo.tasks.v1";

/// Result type for persistence operations that can fail.
pub type StorageResult<T> = Result<T, StorageError>;

/// Persistence failure surfaced to the presentation layer as an advisory.
///
/// Both variants are non-fatal: the in-memory collection keeps operating.
#[derive(Debug)]
pub enum StorageError {
    /// Backend inaccessible on read or write.
    Unavailable(BackendError),
    /// Slot payload present but not a well-formed task array; the saved
    /// data was discarded and the collection starts empty.
    Corrupt(String),
    /// Collection could not be serialized for saving; the slot is untouched.
    Encode(String),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(err) => write!(
                f,
                "could not access task storage; changes may not persist: {err}"
            ),
            Self::Corrupt(message) => {
                write!(f, "saved task data was invalid and was reset: {message}")
            }
            Self::Encode(message) => {
                write!(f, "could not encode tasks for saving; nothing was written: {message}")
            }
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Unavailable(err) => Some(err),
            Self::Corrupt(_) | Self::Encode(_) => None,
        }
    }
}

impl From<BackendError> for StorageError {
    fn from(value: BackendError) -> Self {
        Self::Unavailable(value)
    }
}

/// Result of a defensive load: tasks plus an optional advisory.
#[derive(Debug)]
pub struct LoadedTasks {
    pub tasks: Vec<Task>,
    pub error: Option<StorageError>,
}

/// Whole-collection persistence over one key-value slot.
pub struct TaskStorage<B: StorageBackend> {
    backend: B,
}

impl<B: StorageBackend> TaskStorage<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Loads the persisted collection from the slot.
    ///
    /// # Contract
    /// - Absent slot: empty collection, no error.
    /// - Unreachable backend: empty collection + `StorageError::Unavailable`.
    /// - Non-array payload: empty collection + `StorageError::Corrupt`.
    /// - Malformed records inside a valid array are coerced or discarded
    ///   individually; the rest of the load still succeeds.
    pub fn load(&self) -> LoadedTasks {
        let raw = match self.backend.get(TASKS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                info!("event=tasks_load module=storage status=ok source=empty count=0");
                return LoadedTasks {
                    tasks: Vec::new(),
                    error: None,
                };
            }
            Err(err) => {
                warn!(
                    "event=tasks_load module=storage status=error error_code=backend_unavailable error={err}"
                );
                return LoadedTasks {
                    tasks: Vec::new(),
                    error: Some(StorageError::Unavailable(err)),
                };
            }
        };

        let parsed: Value = match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(err) => {
                warn!(
                    "event=tasks_load module=storage status=error error_code=payload_corrupt error={err}"
                );
                return LoadedTasks {
                    tasks: Vec::new(),
                    error: Some(StorageError::Corrupt(format!(
                        "payload is not valid JSON: {err}"
                    ))),
                };
            }
        };

        let Value::Array(records) = parsed else {
            warn!(
                "event=tasks_load module=storage status=error error_code=payload_corrupt error=top_level_not_array"
            );
            return LoadedTasks {
                tasks: Vec::new(),
                error: Some(StorageError::Corrupt(
                    "top-level value is not an array".to_string(),
                )),
            };
        };

        let tasks = decode_records(records);
        info!(
            "event=tasks_load module=storage status=ok source=slot count={}",
            tasks.len()
        );
        LoadedTasks { tasks, error: None }
    }

    /// Serializes and writes the full collection to the slot.
    ///
    /// # Errors
    /// Returns `StorageError::Unavailable` when the backend rejects the
    /// write, or `StorageError::Encode` when serialization itself fails;
    /// callers keep their in-memory state either way.
    pub fn save(&self, tasks: &[Task]) -> StorageResult<()> {
        let payload =
            serde_json::to_string(tasks).map_err(|err| StorageError::Encode(err.to_string()))?;

        match self.backend.put(TASKS_KEY, &payload) {
            Ok(()) => {
                info!(
                    "event=tasks_save module=storage status=ok count={}",
                    tasks.len()
                );
                Ok(())
            }
            Err(err) => {
                warn!(
                    "event=tasks_save module=storage status=error error_code=backend_unavailable error={err}"
                );
                Err(StorageError::Unavailable(err))
            }
        }
    }
}

/// Coerces a foreign record array into well-formed tasks.
///
/// Non-object records are discarded. Records whose id duplicates an earlier
/// record's id are dropped so collection-level id uniqueness holds.
fn decode_records(records: Vec<Value>) -> Vec<Task> {
    let mut seen = HashSet::new();
    let mut tasks = Vec::with_capacity(records.len());

    for record in records {
        let Value::Object(fields) = record else {
            continue;
        };
        let task = coerce_task(&fields);
        if seen.insert(task.id.clone()) {
            tasks.push(task);
        }
    }

    tasks
}

/// Coerces one record's fields to their declared types and defaults.
///
/// # Contract
/// - Non-string id: fresh generated id.
/// - Non-string title: `"Untitled"`.
/// - `completed`: JSON truthiness of whatever is stored.
/// - Non-numeric createdAt: current time.
/// - Non-string or unrecognized priority: `Medium`.
fn coerce_task(fields: &Map<String, Value>) -> Task {
    let id = match fields.get("id") {
        Some(Value::String(id)) => id.clone(),
        _ => generate_id(),
    };

    let title = match fields.get("title") {
        Some(Value::String(title)) => title.clone(),
        _ => "Untitled".to_string(),
    };

    let completed = fields.get("completed").is_some_and(json_truthy);

    let created_at = match fields.get("createdAt") {
        Some(Value::Number(number)) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|ms| ms as i64))
            .unwrap_or_else(now_epoch_ms),
        _ => now_epoch_ms(),
    };

    let priority = match fields.get("priority") {
        Some(Value::String(priority)) => Priority::normalize(priority),
        _ => Priority::Medium,
    };

    Task {
        id,
        title,
        completed,
        created_at,
        priority,
    }
}

/// JavaScript-style truthiness for loosely typed persisted flags.
fn json_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::{coerce_task, decode_records, json_truthy};
    use crate::model::task::Priority;
    use serde_json::{json, Value};

    fn as_object(value: Value) -> serde_json::Map<String, Value> {
        match value {
            Value::Object(fields) => fields,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn json_truthy_follows_javascript_semantics() {
        assert!(!json_truthy(&json!(null)));
        assert!(!json_truthy(&json!(false)));
        assert!(!json_truthy(&json!(0)));
        assert!(!json_truthy(&json!("")));
        assert!(json_truthy(&json!(true)));
        assert!(json_truthy(&json!(1)));
        assert!(json_truthy(&json!("yes")));
        assert!(json_truthy(&json!([])));
        assert!(json_truthy(&json!({})));
    }

    #[test]
    fn coerce_preserves_well_formed_fields() {
        let fields = as_object(json!({
            "id": "a-1",
            "title": "Buy milk",
            "completed": true,
            "createdAt": 1700000000000_i64,
            "priority": "High"
        }));
        let task = coerce_task(&fields);

        assert_eq!(task.id, "a-1");
        assert_eq!(task.title, "Buy milk");
        assert!(task.completed);
        assert_eq!(task.created_at, 1_700_000_000_000);
        assert_eq!(task.priority, Priority::High);
    }

    #[test]
    fn coerce_defaults_every_malformed_field() {
        let fields = as_object(json!({
            "id": 7,
            "title": 42,
            "completed": "done",
            "createdAt": "yesterday",
            "priority": ["High"]
        }));
        let task = coerce_task(&fields);

        assert!(!task.id.is_empty());
        assert_eq!(task.title, "Untitled");
        assert!(task.completed);
        assert!(task.created_at > 0);
        assert_eq!(task.priority, Priority::Medium);
    }

    #[test]
    fn encode_failure_advisory_does_not_claim_a_reset() {
        let advisory = super::StorageError::Encode("key must be a string".to_string()).to_string();
        assert!(advisory.contains("could not encode tasks"));
        assert!(advisory.contains("nothing was written"));
        assert!(!advisory.contains("reset"));
    }

    #[test]
    fn decode_discards_non_objects_and_duplicate_ids() {
        let records = vec![
            json!({"id": "a", "title": "first", "completed": false, "createdAt": 1, "priority": "Low"}),
            json!(42),
            json!("task"),
            json!({"id": "a", "title": "shadowed", "completed": true, "createdAt": 2, "priority": "High"}),
        ];
        let tasks = decode_records(records);

        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "first");
    }
}
