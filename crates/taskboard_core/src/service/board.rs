//! Board session: a task store plus the current view selection.
//!
//! # Invariants
//! - The filter starts as `TaskFilter::All` on every open and is never
//!   persisted.
//! - `snapshot()` is a pure projection of current state.

use crate::config::StoreConfig;
use crate::model::filter::{TaskFilter, TaskStats};
use crate::model::task::Task;
use crate::repo::persistence::PersistenceAdapter;
use crate::service::command::{CommandOutcome, TaskCommand};
use crate::service::task_store::{Committed, StoreResult, TaskStore};
use log::debug;

/// Everything a renderer needs to draw the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSnapshot {
    pub filter: TaskFilter,
    pub items: Vec<Task>,
    pub stats: TaskStats,
    pub show_clear_completed: bool,
}

/// Composing session used by presentation layers.
pub struct TaskBoard<P: PersistenceAdapter> {
    store: TaskStore<P>,
    filter: TaskFilter,
}

impl<P: PersistenceAdapter> TaskBoard<P> {
    pub fn open(persistence: P, config: &StoreConfig) -> Self {
        Self::from_store(TaskStore::open(persistence, config))
    }

    pub fn from_store(store: TaskStore<P>) -> Self {
        Self {
            store,
            filter: TaskFilter::All,
        }
    }

    pub fn filter(&self) -> TaskFilter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: TaskFilter) {
        debug!("event=filter_set module=board status=ok filter={filter}");
        self.filter = filter;
    }

    pub fn dispatch(&mut self, command: TaskCommand) -> StoreResult<Committed<CommandOutcome>> {
        self.store.apply(command)
    }

    pub fn store(&self) -> &TaskStore<P> {
        &self.store
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        let stats = self.store.stats();
        BoardSnapshot {
            filter: self.filter,
            items: self
                .store
                .filtered_view(self.filter)
                .into_iter()
                .cloned()
                .collect(),
            stats,
            show_clear_completed: stats.has_completed(),
        }
    }
}
