//! Persisted representation of the task list.
//!
//! The wire shape is a JSON array of `{id, text, completed, createdAt}`
//! records in list order.

use crate::model::task::{Task, TaskId};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors produced while encoding or decoding the persisted list.
#[derive(Debug)]
pub enum CodecError {
    /// Payload is not a valid JSON task array (includes invalid records).
    Json(serde_json::Error),
    /// Two records share one id.
    DuplicateId(TaskId),
}

impl Display for CodecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "invalid persisted task list: {err}"),
            Self::DuplicateId(id) => write!(f, "duplicate task id {id} in persisted list"),
        }
    }
}

impl Error for CodecError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::DuplicateId(_) => None,
        }
    }
}

impl From<serde_json::Error> for CodecError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Serializes tasks into the persisted representation, preserving order.
pub fn encode_tasks(tasks: &[Task]) -> Result<String, CodecError> {
    Ok(serde_json::to_string(tasks)?)
}

/// Parses the persisted representation.
///
/// # Errors
/// - `CodecError::Json` for malformed JSON or records failing validation.
/// - `CodecError::DuplicateId` when ids are not pairwise distinct.
pub fn decode_tasks(serialized: &str) -> Result<Vec<Task>, CodecError> {
    let tasks: Vec<Task> = serde_json::from_str(serialized)?;

    let mut seen = HashSet::with_capacity(tasks.len());
    for task in &tasks {
        if !seen.insert(task.id) {
            return Err(CodecError::DuplicateId(task.id));
        }
    }

    Ok(tasks)
}
