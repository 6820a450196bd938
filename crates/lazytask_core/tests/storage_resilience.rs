use lazytask_core::db::open_db_in_memory;
use lazytask_core::{
    BackendError, Priority, SqliteBackend, StorageBackend, StorageError, TaskStorage, TaskStore,
    TaskUpdate, TASKS_KEY,
};
use std::cell::Cell;
use std::rc::Rc;

/// Backend standing in for blocked storage (quota, permissions, privacy
/// mode): every access fails.
struct OfflineBackend;

impl StorageBackend for OfflineBackend {
    fn get(&self, _key: &str) -> Result<Option<String>, BackendError> {
        Err(BackendError::Unavailable("quota exceeded".to_string()))
    }

    fn put(&self, _key: &str, _value: &str) -> Result<(), BackendError> {
        Err(BackendError::Unavailable("quota exceeded".to_string()))
    }
}

#[test]
fn garbage_payload_loads_empty_with_corrupt_advisory() {
    let conn = open_db_in_memory().unwrap();
    let backend = SqliteBackend::new(&conn);
    backend.put(TASKS_KEY, "definitely not json").unwrap();

    let loaded = TaskStorage::new(backend).load();
    assert!(loaded.tasks.is_empty());
    assert!(matches!(loaded.error, Some(StorageError::Corrupt(_))));
}

#[test]
fn non_array_payload_loads_empty_with_corrupt_advisory() {
    let conn = open_db_in_memory().unwrap();
    let backend = SqliteBackend::new(&conn);
    backend.put(TASKS_KEY, r#"{"tasks": []}"#).unwrap();

    let loaded = TaskStorage::new(backend).load();
    assert!(loaded.tasks.is_empty());
    assert!(matches!(loaded.error, Some(StorageError::Corrupt(_))));
}

#[test]
fn malformed_records_are_coerced_without_failing_the_load() {
    let conn = open_db_in_memory().unwrap();
    let backend = SqliteBackend::new(&conn);
    backend
        .put(
            TASKS_KEY,
            r#"[
                {"id": 7, "title": 42, "completed": "yes", "createdAt": "never", "priority": "LOW"},
                "not a record",
                {"id": "keep", "title": "Call bank", "completed": false, "createdAt": 5, "priority": "high"}
            ]"#,
        )
        .unwrap();

    let loaded = TaskStorage::new(backend).load();
    assert!(loaded.error.is_none());
    assert_eq!(loaded.tasks.len(), 2);

    let coerced = &loaded.tasks[0];
    assert!(!coerced.id.is_empty());
    assert_eq!(coerced.title, "Untitled");
    assert!(coerced.completed);
    assert!(coerced.created_at > 0);
    assert_eq!(coerced.priority, Priority::Low);

    let kept = &loaded.tasks[1];
    assert_eq!(kept.id, "keep");
    assert_eq!(kept.title, "Call bank");
    assert_eq!(kept.created_at, 5);
    assert_eq!(kept.priority, Priority::High);
}

#[test]
fn unreachable_backend_loads_empty_with_unavailable_advisory() {
    let loaded = TaskStorage::new(OfflineBackend).load();
    assert!(loaded.tasks.is_empty());
    assert!(matches!(loaded.error, Some(StorageError::Unavailable(_))));
}

#[test]
fn store_keeps_operating_when_every_save_fails() {
    let mut store = TaskStore::load(TaskStorage::new(OfflineBackend));

    let advisory = store.storage_error().expect("load advisory expected");
    assert!(advisory.contains("could not access task storage"));

    let id = store.create("Buy milk", "High").unwrap();
    assert_eq!(store.tasks().len(), 1);
    assert!(store
        .save_error()
        .expect("save advisory expected")
        .contains("could not access task storage"));

    store.toggle(&id);
    assert!(store.tasks()[0].completed);
    assert_eq!(store.summary().completed, 1);
}

/// Backend counting every write that reaches it.
struct CountingBackend<'conn> {
    inner: SqliteBackend<'conn>,
    puts: Rc<Cell<usize>>,
}

impl StorageBackend for CountingBackend<'_> {
    fn get(&self, key: &str) -> Result<Option<String>, BackendError> {
        self.inner.get(key)
    }

    fn put(&self, key: &str, value: &str) -> Result<(), BackendError> {
        self.puts.set(self.puts.get() + 1);
        self.inner.put(key, value)
    }
}

#[test]
fn noop_and_rejected_mutations_do_not_write_to_storage() {
    let conn = open_db_in_memory().unwrap();
    let puts = Rc::new(Cell::new(0));
    let backend = CountingBackend {
        inner: SqliteBackend::new(&conn),
        puts: Rc::clone(&puts),
    };
    let mut store = TaskStore::load(TaskStorage::new(backend));

    let id = store.create("Buy milk", "High").unwrap();
    let writes_after_create = puts.get();
    assert_eq!(writes_after_create, 1);

    store.toggle("no-such-id");
    store.delete("no-such-id");
    store
        .update(
            "no-such-id",
            TaskUpdate {
                title: Some("Ghost".to_string()),
                ..TaskUpdate::default()
            },
        )
        .unwrap();
    store.create("   ", "High").unwrap_err();
    store
        .update(
            &id,
            TaskUpdate {
                title: Some("   ".to_string()),
                ..TaskUpdate::default()
            },
        )
        .unwrap_err();
    assert_eq!(puts.get(), writes_after_create);

    store.toggle(&id);
    assert_eq!(puts.get(), writes_after_create + 1);
}

/// Backend whose next write fails once, then recovers.
struct FlakyBackend<'conn> {
    inner: SqliteBackend<'conn>,
    fail_next_put: Cell<bool>,
}

impl StorageBackend for FlakyBackend<'_> {
    fn get(&self, key: &str) -> Result<Option<String>, BackendError> {
        self.inner.get(key)
    }

    fn put(&self, key: &str, value: &str) -> Result<(), BackendError> {
        if self.fail_next_put.replace(false) {
            return Err(BackendError::Unavailable("transient outage".to_string()));
        }
        self.inner.put(key, value)
    }
}

#[test]
fn successful_save_clears_a_previous_save_advisory() {
    let conn = open_db_in_memory().unwrap();
    let backend = FlakyBackend {
        inner: SqliteBackend::new(&conn),
        fail_next_put: Cell::new(true),
    };
    let mut store = TaskStore::load(TaskStorage::new(backend));

    store.create("Buy milk", "High").unwrap();
    assert!(store.save_error().is_some());

    store.create("Call bank", "").unwrap();
    assert!(store.save_error().is_none());
    assert_eq!(store.tasks().len(), 2);
}
