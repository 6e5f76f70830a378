//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical task record and its persisted wire shape.
//! - Normalize and validate user-entered text.
//!
//! # Invariants
//! - `id` and `created_at` are set once at construction and never mutated.
//! - `text` is trimmed and non-empty for every valid task.
//! - `created_at` carries millisecond precision so the ISO-8601 wire form
//!   round-trips losslessly.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable identifier for a task, serialized as a JSON number.
pub type TaskId = u64;

/// Validation errors for task construction and edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Text was empty or whitespace-only after trimming.
    EmptyText,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyText => write!(f, "task text cannot be empty"),
        }
    }
}

impl Error for TaskValidationError {}

/// Canonical task record.
///
/// Field names on the wire follow the persisted representation:
/// `id`, `text`, `completed`, `createdAt`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TaskRecord")]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    pub completed: bool,
    #[serde(rename = "createdAt", with = "iso8601_millis")]
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Creates an incomplete task from raw user input.
    ///
    /// # Errors
    /// - Returns `TaskValidationError::EmptyText` when `raw_text` trims to
    ///   an empty string.
    pub fn new(
        id: TaskId,
        raw_text: &str,
        created_at: DateTime<Utc>,
    ) -> Result<Self, TaskValidationError> {
        Ok(Self {
            id,
            text: normalize_task_text(raw_text)?,
            completed: false,
            created_at: created_at.trunc_subsecs(3),
        })
    }

    /// Validates record invariants.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.text.trim().is_empty() {
            return Err(TaskValidationError::EmptyText);
        }
        Ok(())
    }

    /// Returns whether this task still needs doing.
    pub fn is_active(&self) -> bool {
        !self.completed
    }
}

/// Trims user-entered text and rejects empty results.
pub fn normalize_task_text(raw: &str) -> Result<String, TaskValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TaskValidationError::EmptyText);
    }
    Ok(trimmed.to_string())
}

#[derive(Deserialize)]
struct TaskRecord {
    id: TaskId,
    text: String,
    completed: bool,
    #[serde(rename = "createdAt", with = "iso8601_millis")]
    created_at: DateTime<Utc>,
}

impl TryFrom<TaskRecord> for Task {
    type Error = TaskValidationError;

    fn try_from(record: TaskRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: record.id,
            text: normalize_task_text(&record.text)?,
            completed: record.completed,
            created_at: record.created_at.trunc_subsecs(3),
        })
    }
}

mod iso8601_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|value| value.with_timezone(&Utc))
            .map_err(|err| D::Error::custom(format!("invalid createdAt `{raw}`: {err}")))
    }
}
