//! Read-only projections over the task list.

use crate::model::task::Task;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Named view over the task list. Never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TaskFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl TaskFilter {
    /// Stable lowercase name, matching the values accepted by `from_str`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }

    /// Returns whether `task` belongs to this view.
    pub fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Active => !task.completed,
            Self::Completed => task.completed,
        }
    }
}

impl Display for TaskFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a filter name is not one of `all|active|completed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFilterError(pub String);

impl Display for UnknownFilterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown filter `{}`; expected all|active|completed",
            self.0
        )
    }
}

impl Error for UnknownFilterError {}

impl FromStr for TaskFilter {
    type Err = UnknownFilterError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            other => Err(UnknownFilterError(other.to_string())),
        }
    }
}

/// Derived counters over the full task list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskStats {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
}

impl TaskStats {
    /// Counts tasks in one pass. `active` is always `total - completed`.
    pub fn from_tasks<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        let (total, completed) = tasks
            .into_iter()
            .fold((0, 0), |(total, completed), task| {
                (total + 1, completed + usize::from(task.completed))
            });
        Self {
            total,
            active: total - completed,
            completed,
        }
    }

    /// Whether a "clear completed" action has anything to remove.
    pub fn has_completed(&self) -> bool {
        self.completed > 0
    }
}
