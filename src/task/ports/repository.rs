//! Repository port for task persistence with optimistic concurrency.

use crate::task::domain::{Task, TaskId, UserId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Task persistence contract.
///
/// `update` is a compare-and-swap on the task's version: the caller passes
/// the aggregate it read (carrying the version it read), and the update only
/// applies when the stored version still matches. This closes the
/// lost-update window between concurrent reviewers acting on the same task.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID
    /// already exists.
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Persists changes to an existing task when its stored version still
    /// equals the version carried by `task`, and returns the stored
    /// aggregate with its version bumped.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not
    /// exist, or [`TaskRepositoryError::VersionConflict`] when the stored
    /// version differs from the one the caller read.
    async fn update(&self, task: &Task) -> TaskRepositoryResult<Task>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Returns all tasks on which the given user is an assignee.
    async fn list_assigned_to(&self, user_id: UserId) -> TaskRepositoryResult<Vec<Task>>;

    /// Removes a task record. Administrative action, unrelated to the review
    /// workflow.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not
    /// exist.
    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The stored version no longer matches the version the caller read.
    #[error("version conflict on task {task_id}: expected {expected}")]
    VersionConflict {
        /// The task whose update was rejected.
        task_id: TaskId,
        /// The version the caller read and expected to still be current.
        expected: u64,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
