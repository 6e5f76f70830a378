//! Task list state manager.
//!
//! # Responsibility
//! - Own the in-memory task list for one session.
//! - Apply add/toggle/edit/delete/clear-completed mutations.
//! - Flush the list to the persistence adapter after every mutation.
//! - Serve side-effect-free filtered views and counters.
//!
//! # Invariants
//! - Task ids in the list are pairwise distinct.
//! - A rejected operation (`StoreError`) changes nothing and writes nothing.
//! - A failed save never rolls back the in-memory mutation; the failure is
//!   reported on `Committed::persist_error` instead.
//! - After a failed read at open, stored state is only overwritten once a
//!   re-read shows it is absent or undecodable.
//! - New tasks are inserted at the front (most-recent-first).

use crate::config::StoreConfig;
use crate::model::filter::{TaskFilter, TaskStats};
use crate::model::identity::{Clock, IdGenerator, MonotonicIdGenerator, SystemClock};
use crate::model::task::{normalize_task_text, Task, TaskId, TaskValidationError};
use crate::repo::codec::{decode_tasks, encode_tasks};
use crate::repo::persistence::{PersistResult, PersistenceAdapter, PersistenceError};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Recoverable rejection of a store operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    Validation(TaskValidationError),
    NotFound(TaskId),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "task not found: {id}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound(_) => None,
        }
    }
}

impl From<TaskValidationError> for StoreError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Result of an applied mutation.
///
/// `persist_error` is `Some` when the in-memory change succeeded but the
/// follow-up save did not; callers should warn and carry on.
#[derive(Debug)]
pub struct Committed<T> {
    pub value: T,
    pub persist_error: Option<PersistenceError>,
}

impl<T> Committed<T> {
    pub fn is_persisted(&self) -> bool {
        self.persist_error.is_none()
    }

    pub fn into_value(self) -> T {
        self.value
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Committed<U> {
        Committed {
            value: f(self.value),
            persist_error: self.persist_error,
        }
    }
}

/// How the initial task list was obtained.
#[derive(Debug)]
pub enum LoadSource {
    /// Valid persisted state was found.
    Persisted,
    /// Nothing was persisted; the sample tasks were seeded and saved.
    Seeded {
        persist_error: Option<PersistenceError>,
    },
    /// Nothing was persisted and seeding is disabled.
    Empty,
    /// Persisted state could not be decoded and was treated as absent.
    RecoveredFromCorrupt { reason: String },
    /// The adapter failed to read and the list fell back to defaults.
    RecoveredFromReadFailure(PersistenceError),
}

impl LoadSource {
    /// Stable short name used in log lines.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Persisted => "persisted",
            Self::Seeded { .. } => "seeded",
            Self::Empty => "empty",
            Self::RecoveredFromCorrupt { .. } => "recovered_from_corrupt",
            Self::RecoveredFromReadFailure(_) => "recovered_from_read_failure",
        }
    }
}

/// Sample tasks shown on first launch: `(id, text, completed)`.
const SEED_TASKS: &[(TaskId, &str, bool)] = &[
    (1, "Learn JavaScript", false),
    (2, "Build a to-do app", true),
    (3, "Add the full pink design", false),
];

/// Sole owner of the session task list.
pub struct TaskStore<P: PersistenceAdapter> {
    persistence: P,
    ids: Box<dyn IdGenerator>,
    clock: Box<dyn Clock>,
    tasks: Vec<Task>,
    load_source: LoadSource,
    overwrite_guarded: bool,
}

impl<P: PersistenceAdapter> TaskStore<P> {
    /// Opens a store with time-derived ids and the wall clock.
    pub fn open(persistence: P, config: &StoreConfig) -> Self {
        Self::open_with(
            persistence,
            config,
            Box::new(MonotonicIdGenerator::new()),
            Box::new(SystemClock),
        )
    }

    /// Opens a store with injected id and time sources.
    ///
    /// Never fails: unreadable or corrupted persisted state falls back to the
    /// seeded defaults (or an empty list when seeding is disabled), and the
    /// chosen path is reported by `load_source()`.
    pub fn open_with(
        persistence: P,
        config: &StoreConfig,
        ids: Box<dyn IdGenerator>,
        clock: Box<dyn Clock>,
    ) -> Self {
        let mut store = Self {
            persistence,
            ids,
            clock,
            tasks: Vec::new(),
            load_source: LoadSource::Empty,
            overwrite_guarded: false,
        };
        store.load(config.seed_when_empty);

        if let Some(max_id) = store.tasks.iter().map(|task| task.id).max() {
            store.ids.observe(max_id);
        }

        info!(
            "event=store_open module=store status=ok source={} total={}",
            store.load_source.as_str(),
            store.tasks.len()
        );
        store
    }

    fn load(&mut self, seed_when_empty: bool) {
        let raw = match self.persistence.load() {
            Ok(raw) => raw,
            Err(err) => {
                warn!(
                    "event=store_load module=store status=error error_code=read_failed error={}",
                    err
                );
                if seed_when_empty {
                    self.tasks = self.seed_tasks();
                }
                self.overwrite_guarded = true;
                self.load_source = LoadSource::RecoveredFromReadFailure(err);
                return;
            }
        };

        let Some(raw) = raw else {
            if !seed_when_empty {
                self.load_source = LoadSource::Empty;
                return;
            }
            self.tasks = self.seed_tasks();
            let persist_error = self.persist("store_seed");
            self.load_source = LoadSource::Seeded { persist_error };
            return;
        };

        match decode_tasks(&raw) {
            Ok(tasks) => {
                self.tasks = tasks;
                self.load_source = LoadSource::Persisted;
            }
            Err(err) => {
                warn!(
                    "event=store_load module=store status=error error_code=corrupt_state error={}",
                    err
                );
                // The unreadable payload stays in place until the first mutation.
                if seed_when_empty {
                    self.tasks = self.seed_tasks();
                }
                self.load_source = LoadSource::RecoveredFromCorrupt {
                    reason: err.to_string(),
                };
            }
        }
    }

    fn seed_tasks(&self) -> Vec<Task> {
        let created_at = self.clock.now();
        SEED_TASKS
            .iter()
            .filter_map(|&(id, text, completed)| {
                let mut task = Task::new(id, text, created_at).ok()?;
                task.completed = completed;
                Some(task)
            })
            .collect()
    }

    /// Returns how the initial list was obtained.
    pub fn load_source(&self) -> &LoadSource {
        &self.load_source
    }

    /// Adds a task with trimmed `raw_text` at the front of the list.
    ///
    /// # Errors
    /// - `StoreError::Validation` when the text trims to empty.
    pub fn add(&mut self, raw_text: &str) -> StoreResult<Committed<Task>> {
        let text = normalize_task_text(raw_text)?;
        let id = self.fresh_id();
        let task = Task::new(id, &text, self.clock.now())?;

        self.tasks.insert(0, task.clone());
        debug!(
            "event=task_add module=store status=ok task_id={} total={}",
            id,
            self.tasks.len()
        );

        let persist_error = self.persist("task_add");
        Ok(Committed {
            value: task,
            persist_error,
        })
    }

    /// Flips the completion flag of task `id`.
    pub fn toggle(&mut self, id: TaskId) -> StoreResult<Committed<Task>> {
        let index = self.index_of(id)?;
        let task = &mut self.tasks[index];
        task.completed = !task.completed;
        let task = task.clone();
        debug!(
            "event=task_toggle module=store status=ok task_id={} completed={}",
            id, task.completed
        );

        let persist_error = self.persist("task_toggle");
        Ok(Committed {
            value: task,
            persist_error,
        })
    }

    /// Replaces the text of task `id` with trimmed `new_text`.
    ///
    /// # Errors
    /// - `StoreError::Validation` when the text trims to empty; the task keeps
    ///   its current text.
    /// - `StoreError::NotFound` when no task has `id`.
    pub fn edit(&mut self, id: TaskId, new_text: &str) -> StoreResult<Committed<Task>> {
        let text = normalize_task_text(new_text)?;
        let index = self.index_of(id)?;
        let task = &mut self.tasks[index];
        task.text = text;
        let task = task.clone();
        debug!("event=task_edit module=store status=ok task_id={id}");

        let persist_error = self.persist("task_edit");
        Ok(Committed {
            value: task,
            persist_error,
        })
    }

    /// Removes task `id` and returns it.
    pub fn delete(&mut self, id: TaskId) -> StoreResult<Committed<Task>> {
        let index = self.index_of(id)?;
        let removed = self.tasks.remove(index);
        debug!(
            "event=task_delete module=store status=ok task_id={} total={}",
            id,
            self.tasks.len()
        );

        let persist_error = self.persist("task_delete");
        Ok(Committed {
            value: removed,
            persist_error,
        })
    }

    /// Removes every completed task in one update and returns how many went.
    ///
    /// Removing nothing is not an error and does not write.
    pub fn clear_completed(&mut self) -> Committed<usize> {
        let before = self.tasks.len();
        self.tasks.retain(Task::is_active);
        let removed = before - self.tasks.len();

        if removed == 0 {
            return Committed {
                value: 0,
                persist_error: None,
            };
        }

        debug!(
            "event=tasks_clear_completed module=store status=ok removed={} total={}",
            removed,
            self.tasks.len()
        );
        let persist_error = self.persist("tasks_clear_completed");
        Committed {
            value: removed,
            persist_error,
        }
    }

    /// Tasks matching `filter`, in list order.
    pub fn filtered_view(&self, filter: TaskFilter) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|task| filter.matches(task))
            .collect()
    }

    /// Counters over the full list.
    pub fn stats(&self) -> TaskStats {
        TaskStats::from_tasks(&self.tasks)
    }

    /// Full list in display order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Borrow of the underlying persistence adapter.
    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    fn index_of(&self, id: TaskId) -> StoreResult<usize> {
        self.tasks
            .iter()
            .position(|task| task.id == id)
            .ok_or(StoreError::NotFound(id))
    }

    fn fresh_id(&mut self) -> TaskId {
        for _ in 0..=self.tasks.len() {
            let candidate = self.ids.next_id();
            if self.get(candidate).is_none() {
                return candidate;
            }
        }

        // Generator is stuck on taken ids; use the smallest free one.
        let mut taken: Vec<TaskId> = self.tasks.iter().map(|task| task.id).collect();
        taken.sort_unstable();
        let mut free = 0;
        for id in taken {
            if id != free {
                break;
            }
            free += 1;
        }
        self.ids.observe(free);
        free
    }

    fn persist(&mut self, event: &'static str) -> Option<PersistenceError> {
        match self.write_through() {
            Ok(()) => None,
            Err(err) => {
                warn!(
                    "event=store_save module=store status=error trigger={} error={}",
                    event, err
                );
                Some(err)
            }
        }
    }

    fn write_through(&mut self) -> PersistResult<()> {
        self.ensure_overwrite_allowed()?;
        let serialized = encode_tasks(&self.tasks)?;
        self.persistence.save(&serialized)
    }

    fn ensure_overwrite_allowed(&mut self) -> PersistResult<()> {
        if !self.overwrite_guarded {
            return Ok(());
        }

        match self.persistence.load()? {
            Some(raw) if decode_tasks(&raw).is_ok() => {
                return Err(PersistenceError::UnreadAtOpen);
            }
            Some(_) | None => {}
        }

        info!("event=store_guard module=store status=ok action=release");
        self.overwrite_guarded = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{TaskStore, SEED_TASKS};
    use crate::config::StoreConfig;
    use crate::model::identity::{FixedClock, IdGenerator};
    use crate::model::task::TaskId;
    use crate::repo::persistence::MemoryPersistence;
    use chrono::{TimeZone, Utc};

    struct StuckIds(TaskId);

    impl IdGenerator for StuckIds {
        fn next_id(&mut self) -> TaskId {
            self.0
        }

        fn observe(&mut self, _id: TaskId) {}
    }

    #[test]
    fn colliding_generator_never_overwrites_existing_tasks() {
        let clock = FixedClock(Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap());
        let mut store = TaskStore::open_with(
            MemoryPersistence::new(),
            &StoreConfig::default(),
            Box::new(StuckIds(2)),
            Box::new(clock),
        );
        assert_eq!(store.tasks().len(), SEED_TASKS.len());

        let added = store.add("fresh").unwrap().into_value();
        assert_eq!(added.id, 0);
        assert_eq!(store.get(2).unwrap().text, "Build a to-do app");
        assert_eq!(store.tasks().len(), SEED_TASKS.len() + 1);
    }
}
