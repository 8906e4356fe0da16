use thiserror::Error;

use crate::store::StoreError;

/// Errors surfaced by task collection operations.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("Task text cannot be empty")]
    EmptyText,
    #[error("Task deadline cannot be empty")]
    EmptyDeadline,
    #[error("No task with id '{0}'")]
    UnknownId(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl TaskError {
    /// True for errors the user can fix by adjusting their input.
    pub fn is_validation(&self) -> bool {
        matches!(self, TaskError::EmptyText | TaskError::EmptyDeadline)
    }
}
