//! Core domain logic for Taskboard.
//! This crate is the single source of truth for task list invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, StoreConfig, DEFAULT_STORAGE_KEY};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::filter::{TaskFilter, TaskStats, UnknownFilterError};
pub use model::identity::{
    Clock, FixedClock, IdGenerator, MonotonicIdGenerator, SequentialIdGenerator, SystemClock,
};
pub use model::task::{Task, TaskId, TaskValidationError};
pub use repo::codec::{decode_tasks, encode_tasks, CodecError};
pub use repo::persistence::{
    MemoryPersistence, PersistResult, PersistenceAdapter, PersistenceError,
};
pub use repo::sqlite_persistence::SqlitePersistence;
pub use service::board::{BoardSnapshot, TaskBoard};
pub use service::command::{CommandOutcome, Notice, NoticeLevel, TaskCommand};
pub use service::task_store::{Committed, LoadSource, StoreError, StoreResult, TaskStore};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
