//! Typed command interface over the task store.
//!
//! # Responsibility
//! - Let presentation layers issue mutations as values instead of calling
//!   store methods from UI callbacks.
//! - Map outcomes and rejections to user-facing notices.
//!
//! # Invariants
//! - `apply` has exactly the semantics of the matching store method.

use crate::model::task::{Task, TaskId, TaskValidationError};
use crate::repo::persistence::PersistenceAdapter;
use crate::service::task_store::{Committed, StoreError, StoreResult, TaskStore};

/// Mutation requested by a caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskCommand {
    Add { text: String },
    Toggle { id: TaskId },
    Edit { id: TaskId, text: String },
    Delete { id: TaskId },
    ClearCompleted,
}

/// Successful result of a `TaskCommand`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Added(Task),
    Toggled(Task),
    Edited(Task),
    Deleted(Task),
    ClearedCompleted(usize),
}

/// Severity of a user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

impl NoticeLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Error => "error",
        }
    }
}

/// Transient message a presentation layer may show after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

impl CommandOutcome {
    /// Notice shown after success. Toggling is silent.
    pub fn notice(&self) -> Option<Notice> {
        match self {
            Self::Added(_) => Some(Notice::new(NoticeLevel::Success, "Task added!")),
            Self::Edited(_) => Some(Notice::new(NoticeLevel::Success, "Task updated!")),
            Self::Deleted(_) => Some(Notice::new(NoticeLevel::Info, "Task deleted!")),
            Self::ClearedCompleted(_) => {
                Some(Notice::new(NoticeLevel::Info, "Completed tasks removed!"))
            }
            Self::Toggled(_) => None,
        }
    }
}

impl StoreError {
    /// Notice shown when a command is rejected.
    pub fn notice(&self) -> Notice {
        match self {
            Self::Validation(TaskValidationError::EmptyText) => {
                Notice::new(NoticeLevel::Error, "Please enter a task!")
            }
            Self::NotFound(_) => Notice::new(NoticeLevel::Error, "Task no longer exists."),
        }
    }
}

impl<T> Committed<T> {
    /// Warning to surface when the change could not be saved.
    pub fn persist_notice(&self) -> Option<Notice> {
        self.persist_error.as_ref().map(|_| {
            Notice::new(
                NoticeLevel::Error,
                "Changes could not be saved; they will be lost on reload.",
            )
        })
    }
}

impl<P: PersistenceAdapter> TaskStore<P> {
    /// Applies one command.
    pub fn apply(&mut self, command: TaskCommand) -> StoreResult<Committed<CommandOutcome>> {
        match command {
            TaskCommand::Add { text } => Ok(self.add(&text)?.map(CommandOutcome::Added)),
            TaskCommand::Toggle { id } => Ok(self.toggle(id)?.map(CommandOutcome::Toggled)),
            TaskCommand::Edit { id, text } => {
                Ok(self.edit(id, &text)?.map(CommandOutcome::Edited))
            }
            TaskCommand::Delete { id } => Ok(self.delete(id)?.map(CommandOutcome::Deleted)),
            TaskCommand::ClearCompleted => {
                Ok(self.clear_completed().map(CommandOutcome::ClearedCompleted))
            }
        }
    }
}
