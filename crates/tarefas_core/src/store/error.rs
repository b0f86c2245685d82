//! Error taxonomy shared by the credential, group and task stores.

use crate::model::id::{GroupId, TaskId};
use crate::model::validation::ValidationError;
use crate::repo::kv_repo::StorageError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Coarse error class a front end can switch on.
///
/// Every kind except `Storage` is recoverable at the call site; `Storage`
/// ends the triggering operation with nothing persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Duplicate,
    Auth,
    NotFound,
    EmptyOperation,
    Storage,
}

#[derive(Debug)]
pub enum StoreError {
    Validation(ValidationError),
    DuplicateUsername(String),
    /// Owner already has a group with this (trimmed) name.
    DuplicateGroupName(String),
    /// Unknown username or wrong password. Deliberately not split.
    InvalidCredentials,
    GroupNotFound(GroupId),
    TaskNotFound(TaskId),
    /// Bulk reset found no completed task in scope.
    NoCompletedTasks,
    Storage(StorageError),
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::DuplicateUsername(_) | Self::DuplicateGroupName(_) => ErrorKind::Duplicate,
            Self::InvalidCredentials => ErrorKind::Auth,
            Self::GroupNotFound(_) | Self::TaskNotFound(_) => ErrorKind::NotFound,
            Self::NoCompletedTasks => ErrorKind::EmptyOperation,
            Self::Storage(_) => ErrorKind::Storage,
        }
    }

    /// Short machine-readable code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::DuplicateUsername(_) => "duplicate_username",
            Self::DuplicateGroupName(_) => "duplicate_group_name",
            Self::InvalidCredentials => "invalid_credentials",
            Self::GroupNotFound(_) => "group_not_found",
            Self::TaskNotFound(_) => "task_not_found",
            Self::NoCompletedTasks => "no_completed_tasks",
            Self::Storage(_) => "storage",
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::DuplicateUsername(name) => write!(f, "user already exists: {name}"),
            Self::DuplicateGroupName(name) => write!(f, "group already exists: {name}"),
            Self::InvalidCredentials => write!(f, "invalid username or password"),
            Self::GroupNotFound(id) => write!(f, "group not found: {id}"),
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
            Self::NoCompletedTasks => write!(f, "there are no completed tasks to reset"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for StoreError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StorageError> for StoreError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

#[cfg(test)]
mod tests {
    use super::{ErrorKind, StoreError};
    use crate::model::id::TaskId;
    use crate::model::validation::ValidationError;

    #[test]
    fn kinds_follow_taxonomy() {
        assert_eq!(
            StoreError::from(ValidationError::EmptyTaskText).kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            StoreError::DuplicateGroupName("Work".into()).kind(),
            ErrorKind::Duplicate
        );
        assert_eq!(StoreError::InvalidCredentials.kind(), ErrorKind::Auth);
        assert_eq!(
            StoreError::TaskNotFound(TaskId::from("t1")).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            StoreError::NoCompletedTasks.kind(),
            ErrorKind::EmptyOperation
        );
    }

    #[test]
    fn credential_failure_message_does_not_say_which_part_failed() {
        let message = StoreError::InvalidCredentials.to_string();
        assert_eq!(message, "invalid username or password");
    }
}
