use lazytask_core::{Priority, Task, TaskValidationError};
use serde_json::json;

#[test]
fn create_sets_defaults_and_unique_ids() {
    let first = Task::new("Buy milk", "High").unwrap();
    let second = Task::new("Call bank", "").unwrap();

    assert!(!first.completed);
    assert!(first.created_at > 0);
    assert_eq!(first.priority, Priority::High);
    assert_eq!(second.priority, Priority::Medium);
    assert_ne!(first.id, second.id);
}

#[test]
fn create_trims_title_and_rejects_blank() {
    let task = Task::new("  Water plants  ", "low").unwrap();
    assert_eq!(task.title, "Water plants");

    assert_eq!(
        Task::new("   ", "low").unwrap_err(),
        TaskValidationError::EmptyTitle
    );
}

#[test]
fn wire_shape_uses_camel_case_timestamp_and_tier_names() {
    let task = Task::new("Buy milk", "high").unwrap();
    let value = serde_json::to_value(&task).unwrap();

    assert!(value["id"].is_string());
    assert_eq!(value["title"], "Buy milk");
    assert_eq!(value["completed"], false);
    assert!(value["createdAt"].is_i64());
    assert_eq!(value["priority"], "High");
}

#[test]
fn well_formed_wire_records_deserialize_directly() {
    let task: Task = serde_json::from_value(json!({
        "id": "t-1",
        "title": "Call bank",
        "completed": true,
        "createdAt": 1_700_000_000_000_i64,
        "priority": "Low"
    }))
    .unwrap();

    assert_eq!(task.id, "t-1");
    assert!(task.completed);
    assert_eq!(task.priority, Priority::Low);
}
