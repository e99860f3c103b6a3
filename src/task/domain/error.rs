//! Error types for task domain validation and workflow guards.

use super::{ChecklistItemId, ReviewStatus, TaskId, UserId, WorkflowAction};
use thiserror::Error;

/// Errors returned while constructing or mutating domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// A checklist item text is empty after trimming.
    #[error("checklist item text must not be empty")]
    EmptyChecklistItem,

    /// A comment was required but missing or empty.
    #[error("a non-empty comment is required")]
    CommentRequired,

    /// The referenced checklist item does not exist on the task.
    #[error("checklist item not found: {0}")]
    ChecklistItemNotFound(ChecklistItemId),

    /// The caller lacks the role or relationship required for the action.
    #[error("user {user_id} may not perform {action} on task {task_id}")]
    PermissionDenied {
        /// The task the action targeted.
        task_id: TaskId,
        /// The caller that was rejected.
        user_id: UserId,
        /// The action that was attempted.
        action: WorkflowAction,
    },

    /// No review transition exists from the current state for the action.
    #[error("no {action} transition from review state '{from}' on task {task_id}")]
    InvalidTransition {
        /// The task the action targeted.
        task_id: TaskId,
        /// The review state the task was in.
        from: ReviewStatus,
        /// The action that was attempted.
        action: WorkflowAction,
    },

    /// The task was nudged again before the cooldown elapsed.
    #[error("task {task_id} was nudged too recently; retry in {retry_after_secs}s")]
    NudgeRateLimited {
        /// The task the nudge targeted.
        task_id: TaskId,
        /// Whole seconds until the next nudge is accepted, rounded up.
        retry_after_secs: u64,
    },
}

/// Error returned while parsing review states from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown review status: {0}")]
pub struct ParseReviewStatusError(pub String);

/// Error returned while parsing derived display statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Error returned while parsing task priorities from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task priority: {0}")]
pub struct ParseTaskPriorityError(pub String);
