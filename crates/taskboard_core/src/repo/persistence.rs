//! Key/value persistence contract consumed by the task store.
//!
//! # Invariants
//! - `load` returns `Ok(None)` only when nothing was ever saved.
//! - `save` overwrites the previous value.

use crate::db::DbError;
use crate::repo::codec::CodecError;
use std::cell::{Cell, RefCell};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type PersistResult<T> = Result<T, PersistenceError>;

/// Read or write failure reported by a persistence adapter.
///
/// Always recoverable from the store's point of view.
#[derive(Debug)]
pub enum PersistenceError {
    Db(DbError),
    Codec(CodecError),
    Unavailable(String),
    /// Stored state could not be read at open; it is not overwritten.
    UnreadAtOpen,
}

impl Display for PersistenceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "persistence failure: {err}"),
            Self::Codec(err) => write!(f, "{err}"),
            Self::Unavailable(message) => write!(f, "persistence unavailable: {message}"),
            Self::UnreadAtOpen => write!(
                f,
                "stored task list could not be read at open; refusing to overwrite it"
            ),
        }
    }
}

impl Error for PersistenceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Codec(err) => Some(err),
            Self::Unavailable(_) | Self::UnreadAtOpen => None,
        }
    }
}

impl From<DbError> for PersistenceError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<CodecError> for PersistenceError {
    fn from(value: CodecError) -> Self {
        Self::Codec(value)
    }
}

impl From<rusqlite::Error> for PersistenceError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Single-slot string store the task list is flushed to.
pub trait PersistenceAdapter {
    fn load(&self) -> PersistResult<Option<String>>;
    fn save(&self, serialized: &str) -> PersistResult<()>;
}

impl<P: PersistenceAdapter + ?Sized> PersistenceAdapter for &P {
    fn load(&self) -> PersistResult<Option<String>> {
        (**self).load()
    }

    fn save(&self, serialized: &str) -> PersistResult<()> {
        (**self).save(serialized)
    }
}

/// In-process persistence adapter.
///
/// Useful for embedding without durable storage and for tests. Writes can be
/// made to fail on demand to exercise non-fatal save handling.
#[derive(Debug, Default)]
pub struct MemoryPersistence {
    value: RefCell<Option<String>>,
    fail_writes: Cell<bool>,
    writes: Cell<usize>,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an adapter that already holds `serialized`.
    pub fn with_value(serialized: impl Into<String>) -> Self {
        Self {
            value: RefCell::new(Some(serialized.into())),
            ..Self::default()
        }
    }

    /// Returns the currently stored value.
    pub fn value(&self) -> Option<String> {
        self.value.borrow().clone()
    }

    /// Number of successful saves so far.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }

    /// Makes subsequent saves fail (`true`) or succeed (`false`).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }
}

impl PersistenceAdapter for MemoryPersistence {
    fn load(&self) -> PersistResult<Option<String>> {
        Ok(self.value.borrow().clone())
    }

    fn save(&self, serialized: &str) -> PersistResult<()> {
        if self.fail_writes.get() {
            return Err(PersistenceError::Unavailable(
                "memory store rejected write".to_string(),
            ));
        }
        *self.value.borrow_mut() = Some(serialized.to_string());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}
