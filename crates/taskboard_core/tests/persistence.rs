use rusqlite::Connection;
use std::cell::{Cell, RefCell};
use taskboard_core::db::schema::{schema_version, SCHEMA_VERSION};
use taskboard_core::db::{open_db, open_db_in_memory, DbError};
use taskboard_core::{
    LoadSource, PersistResult, PersistenceAdapter, PersistenceError, SqlitePersistence,
    StoreConfig, TaskStore,
};

#[test]
fn open_db_creates_kv_schema() {
    let conn = open_db_in_memory().unwrap();
    assert_eq!(schema_version(&conn).unwrap(), SCHEMA_VERSION);

    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'kv_store';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn open_db_rejects_newer_schema() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");
    {
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(&format!("PRAGMA user_version = {};", SCHEMA_VERSION + 1))
            .unwrap();
    }

    let err = open_db(&path).unwrap_err();
    assert!(matches!(
        err,
        DbError::SchemaTooNew {
            found: 2,
            supported: 1
        }
    ));
}

#[test]
fn sqlite_adapter_loads_none_then_overwrites() {
    let conn = open_db_in_memory().unwrap();
    let adapter = SqlitePersistence::new(&conn, "todos");

    assert_eq!(adapter.load().unwrap(), None);
    adapter.save("[]").unwrap();
    adapter.save("[1]").unwrap();
    assert_eq!(adapter.load().unwrap().as_deref(), Some("[1]"));

    let other = SqlitePersistence::new(&conn, "other");
    assert_eq!(other.load().unwrap(), None);
}

#[test]
fn store_state_survives_reopening_database_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("board.sqlite3");
    let config = StoreConfig::default();

    let expected = {
        let conn = open_db(&path).unwrap();
        let mut store = TaskStore::open(SqlitePersistence::new(&conn, "todos"), &config);
        assert!(matches!(store.load_source(), LoadSource::Seeded { .. }));
        let added = store.add("Water plants").unwrap();
        assert!(added.is_persisted());
        store.toggle(1).unwrap();
        store.tasks().to_vec()
    };

    let conn = open_db(&path).unwrap();
    let store = TaskStore::open(SqlitePersistence::new(&conn, "todos"), &config);
    assert!(matches!(store.load_source(), LoadSource::Persisted));
    assert_eq!(store.tasks(), expected.as_slice());
    assert_eq!(store.tasks()[0].text, "Water plants");
}

#[test]
fn save_fails_without_kv_schema_and_store_keeps_going() {
    let conn = Connection::open_in_memory().unwrap();
    let mut store = TaskStore::open(SqlitePersistence::new(&conn, "todos"), &StoreConfig::default());

    assert!(matches!(
        store.load_source(),
        LoadSource::RecoveredFromReadFailure(PersistenceError::Db(_))
    ));
    assert_eq!(store.tasks().len(), 3);

    let committed = store.add("still works").unwrap();
    assert!(matches!(
        committed.persist_error,
        Some(PersistenceError::Db(_))
    ));
    assert_eq!(store.tasks().len(), 4);
}

struct UnreadableStore;

impl PersistenceAdapter for UnreadableStore {
    fn load(&self) -> PersistResult<Option<String>> {
        Err(PersistenceError::Unavailable("disk gone".to_string()))
    }

    fn save(&self, _serialized: &str) -> PersistResult<()> {
        Err(PersistenceError::Unavailable("disk gone".to_string()))
    }
}

#[test]
fn read_failure_without_seeding_starts_empty() {
    let config = StoreConfig {
        seed_when_empty: false,
        ..StoreConfig::default()
    };
    let store = TaskStore::open(UnreadableStore, &config);
    assert!(matches!(
        store.load_source(),
        LoadSource::RecoveredFromReadFailure(PersistenceError::Unavailable(_))
    ));
    assert!(store.tasks().is_empty());
}

/// Fails the first `failures` reads, then behaves like a single-slot store.
struct FlakyStore {
    value: RefCell<Option<String>>,
    failures: Cell<usize>,
}

impl FlakyStore {
    fn new(value: Option<&str>, failures: usize) -> Self {
        Self {
            value: RefCell::new(value.map(str::to_string)),
            failures: Cell::new(failures),
        }
    }
}

impl PersistenceAdapter for FlakyStore {
    fn load(&self) -> PersistResult<Option<String>> {
        if self.failures.get() > 0 {
            self.failures.set(self.failures.get() - 1);
            return Err(PersistenceError::Unavailable("database is locked".to_string()));
        }
        Ok(self.value.borrow().clone())
    }

    fn save(&self, serialized: &str) -> PersistResult<()> {
        *self.value.borrow_mut() = Some(serialized.to_string());
        Ok(())
    }
}

const REAL_LIST: &str =
    r#"[{"id":77,"text":"my real task","completed":false,"createdAt":"2026-01-01T00:00:00.000Z"}]"#;

#[test]
fn transient_read_failure_never_overwrites_stored_list() {
    let mut store = TaskStore::open(FlakyStore::new(Some(REAL_LIST), 1), &StoreConfig::default());
    assert!(matches!(
        store.load_source(),
        LoadSource::RecoveredFromReadFailure(_)
    ));

    let committed = store.add("new").unwrap();
    assert!(matches!(
        committed.persist_error,
        Some(PersistenceError::UnreadAtOpen)
    ));
    assert_eq!(store.tasks()[0].text, "new");

    store.toggle(1).unwrap();
    assert_eq!(
        store.persistence().value.borrow().as_deref(),
        Some(REAL_LIST)
    );
}

#[test]
fn read_failure_then_absent_state_allows_writes() {
    let mut store = TaskStore::open(FlakyStore::new(None, 1), &StoreConfig::default());

    let committed = store.add("first real task").unwrap();
    assert!(committed.is_persisted());

    let reopened = TaskStore::open(store.persistence(), &StoreConfig::default());
    assert!(matches!(reopened.load_source(), LoadSource::Persisted));
    assert_eq!(reopened.tasks(), store.tasks());
}

#[test]
fn read_failure_then_corrupt_state_allows_writes() {
    let mut store = TaskStore::open(FlakyStore::new(Some("{oops"), 1), &StoreConfig::default());

    assert!(store.add("replacement").unwrap().is_persisted());
    let stored = store.persistence().value.borrow().clone().unwrap();
    assert!(stored.contains("replacement"));
}
