//! Task aggregate root and review workflow transitions.

use super::{
    Actor, ChecklistItemId, CommentText, ParseTaskPriorityError, ReviewDecision, ReviewStatus,
    RevisionEntry, TaskComment, TaskDomainError, TaskId, TaskStatus, TaskTitle, TodoChecklist,
    UserId, WorkflowAction,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Minimum number of seconds between accepted nudges on one task.
pub const NUDGE_COOLDOWN_SECS: i64 = 600;

/// Display priority attached to a task.
///
/// Carries no workflow meaning; ordering and filtering only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    /// Low urgency.
    Low,
    /// Default urgency.
    #[default]
    Medium,
    /// High urgency.
    High,
}

impl TaskPriority {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskPriority {
    type Error = ParseTaskPriorityError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(ParseTaskPriorityError(value.to_owned())),
        }
    }
}

/// Validated input for creating a new task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    title: TaskTitle,
    description: Option<String>,
    priority: TaskPriority,
    due_date: Option<DateTime<Utc>>,
    created_by: UserId,
    assigned_to: BTreeSet<UserId>,
    reviewers: BTreeSet<UserId>,
    checklist: TodoChecklist,
}

impl TaskDraft {
    /// Creates a draft with required fields.
    #[must_use]
    pub fn new(title: TaskTitle, created_by: UserId) -> Self {
        Self {
            title,
            description: None,
            priority: TaskPriority::default(),
            due_date: None,
            created_by,
            assigned_to: BTreeSet::new(),
            reviewers: BTreeSet::new(),
            checklist: TodoChecklist::new(),
        }
    }

    /// Sets the task description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the display priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Sets the assignees responsible for the work.
    #[must_use]
    pub fn with_assignees(mut self, assignees: impl IntoIterator<Item = UserId>) -> Self {
        self.assigned_to = assignees.into_iter().collect();
        self
    }

    /// Sets the peer reviewers. May be empty, in which case submission skips
    /// straight to final approval.
    #[must_use]
    pub fn with_reviewers(mut self, reviewers: impl IntoIterator<Item = UserId>) -> Self {
        self.reviewers = reviewers.into_iter().collect();
        self
    }

    /// Sets the initial checklist.
    #[must_use]
    pub fn with_checklist(mut self, checklist: TodoChecklist) -> Self {
        self.checklist = checklist;
        self
    }
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: TaskTitle,
    description: Option<String>,
    priority: TaskPriority,
    due_date: Option<DateTime<Utc>>,
    created_by: UserId,
    assigned_to: BTreeSet<UserId>,
    reviewers: BTreeSet<UserId>,
    status: TaskStatus,
    review_status: ReviewStatus,
    todo_checklist: TodoChecklist,
    revision_history: Vec<RevisionEntry>,
    comments: Vec<TaskComment>,
    last_nudged_at: Option<DateTime<Utc>>,
    version: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted task title.
    pub title: TaskTitle,
    /// Persisted description, if any.
    pub description: Option<String>,
    /// Persisted display priority.
    pub priority: TaskPriority,
    /// Persisted due date, if any.
    pub due_date: Option<DateTime<Utc>>,
    /// Persisted creator (final approver).
    pub created_by: UserId,
    /// Persisted assignee set.
    pub assigned_to: BTreeSet<UserId>,
    /// Persisted reviewer set.
    pub reviewers: BTreeSet<UserId>,
    /// Persisted derived display status.
    pub status: TaskStatus,
    /// Persisted review workflow state.
    pub review_status: ReviewStatus,
    /// Persisted checklist.
    pub todo_checklist: TodoChecklist,
    /// Persisted revision history.
    pub revision_history: Vec<RevisionEntry>,
    /// Persisted comment thread.
    pub comments: Vec<TaskComment>,
    /// Persisted timestamp of the most recent accepted nudge.
    pub last_nudged_at: Option<DateTime<Utc>>,
    /// Persisted optimistic-concurrency version.
    pub version: u64,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new task from a validated draft.
    ///
    /// The review state starts at [`ReviewStatus::NotSubmitted`] and the
    /// display status is derived from the draft checklist.
    #[must_use]
    pub fn new(draft: TaskDraft, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        let status = TaskStatus::from_checklist(&draft.checklist);

        Self {
            id: TaskId::new(),
            title: draft.title,
            description: draft.description,
            priority: draft.priority,
            due_date: draft.due_date,
            created_by: draft.created_by,
            assigned_to: draft.assigned_to,
            reviewers: draft.reviewers,
            status,
            review_status: ReviewStatus::NotSubmitted,
            todo_checklist: draft.checklist,
            revision_history: Vec::new(),
            comments: Vec::new(),
            last_nudged_at: None,
            version: 1,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            priority: data.priority,
            due_date: data.due_date,
            created_by: data.created_by,
            assigned_to: data.assigned_to,
            reviewers: data.reviewers,
            status: data.status,
            review_status: data.review_status,
            todo_checklist: data.todo_checklist,
            revision_history: data.revision_history,
            comments: data.comments,
            last_nudged_at: data.last_nudged_at,
            version: data.version,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the task title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the task description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the display priority.
    #[must_use]
    pub const fn priority(&self) -> TaskPriority {
        self.priority
    }

    /// Returns the due date, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<DateTime<Utc>> {
        self.due_date
    }

    /// Returns the creator, who acts as final approver.
    #[must_use]
    pub const fn created_by(&self) -> UserId {
        self.created_by
    }

    /// Returns the assignee set.
    #[must_use]
    pub const fn assigned_to(&self) -> &BTreeSet<UserId> {
        &self.assigned_to
    }

    /// Returns the reviewer set.
    #[must_use]
    pub const fn reviewers(&self) -> &BTreeSet<UserId> {
        &self.reviewers
    }

    /// Returns the derived display status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the authoritative review workflow state.
    #[must_use]
    pub const fn review_status(&self) -> ReviewStatus {
        self.review_status
    }

    /// Returns the checklist.
    #[must_use]
    pub const fn todo_checklist(&self) -> &TodoChecklist {
        &self.todo_checklist
    }

    /// Returns the revision history, oldest first.
    #[must_use]
    pub fn revision_history(&self) -> &[RevisionEntry] {
        &self.revision_history
    }

    /// Returns the number of recorded revision cycles.
    #[must_use]
    pub const fn revision_count(&self) -> usize {
        self.revision_history.len()
    }

    /// Returns the comment thread, oldest first.
    #[must_use]
    pub fn comments(&self) -> &[TaskComment] {
        &self.comments
    }

    /// Returns the timestamp of the most recent accepted nudge, if any.
    #[must_use]
    pub const fn last_nudged_at(&self) -> Option<DateTime<Utc>> {
        self.last_nudged_at
    }

    /// Returns the optimistic-concurrency version.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns whether the user is one of the task's assignees.
    #[must_use]
    pub fn is_assignee(&self, user_id: UserId) -> bool {
        self.assigned_to.contains(&user_id)
    }

    /// Returns whether the user is one of the task's peer reviewers.
    #[must_use]
    pub fn is_reviewer(&self, user_id: UserId) -> bool {
        self.reviewers.contains(&user_id)
    }

    /// Returns whether the user is an assignee, reviewer, or the creator.
    #[must_use]
    pub fn is_participant(&self, user_id: UserId) -> bool {
        user_id == self.created_by || self.is_assignee(user_id) || self.is_reviewer(user_id)
    }

    /// Returns every user involved with the task: assignees, reviewers, and
    /// the creator.
    #[must_use]
    pub fn participants(&self) -> BTreeSet<UserId> {
        let mut everyone = self.assigned_to.clone();
        everyone.extend(self.reviewers.iter().copied());
        everyone.insert(self.created_by);
        everyone
    }

    /// Submits the task for review.
    ///
    /// Routes to [`ReviewStatus::PendingReview`] when reviewers are assigned,
    /// otherwise directly to [`ReviewStatus::PendingFinalApproval`].
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::PermissionDenied`] when the caller is not
    /// an assignee, or [`TaskDomainError::InvalidTransition`] when the task
    /// is not in a submittable review state.
    pub fn submit_for_review(
        &mut self,
        actor: &Actor,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        if !self.is_assignee(actor.user_id()) {
            return Err(self.permission_denied(actor, WorkflowAction::Submit));
        }
        if !self.review_status.is_submittable() {
            return Err(self.invalid_transition(WorkflowAction::Submit));
        }

        let target = if self.reviewers.is_empty() {
            ReviewStatus::PendingFinalApproval
        } else {
            ReviewStatus::PendingReview
        };
        self.transition_review(target, WorkflowAction::Submit)?;
        self.touch(clock);
        Ok(())
    }

    /// Records a peer reviewer's decision.
    ///
    /// An approval advances the task to final approval; a changes request
    /// appends one revision entry with its mandatory comment and returns the
    /// task to the assignees.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::PermissionDenied`] when the caller is not a
    /// reviewer, [`TaskDomainError::InvalidTransition`] when the task is not
    /// awaiting peer review, or [`TaskDomainError::CommentRequired`] when a
    /// changes request carries no comment.
    pub fn record_peer_review(
        &mut self,
        actor: &Actor,
        decision: ReviewDecision,
        comment: Option<CommentText>,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        if !self.is_reviewer(actor.user_id()) {
            return Err(self.permission_denied(actor, WorkflowAction::PeerReview));
        }
        if self.review_status != ReviewStatus::PendingReview {
            return Err(self.invalid_transition(WorkflowAction::PeerReview));
        }

        match decision {
            ReviewDecision::Approved => {
                self.transition_review(
                    ReviewStatus::PendingFinalApproval,
                    WorkflowAction::PeerReview,
                )?;
            }
            ReviewDecision::ChangesRequested => {
                let revision_comment = comment.ok_or(TaskDomainError::CommentRequired)?;
                self.request_changes(
                    actor.user_id(),
                    revision_comment,
                    WorkflowAction::PeerReview,
                    clock,
                )?;
            }
        }
        self.touch(clock);
        Ok(())
    }

    /// Records the creator's final decision.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::PermissionDenied`] when the caller is not
    /// the creator, [`TaskDomainError::InvalidTransition`] when the task is
    /// not awaiting final approval, or [`TaskDomainError::CommentRequired`]
    /// when a changes request carries no comment.
    pub fn record_final_decision(
        &mut self,
        actor: &Actor,
        decision: ReviewDecision,
        comment: Option<CommentText>,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        if actor.user_id() != self.created_by {
            return Err(self.permission_denied(actor, WorkflowAction::FinalApproval));
        }
        if self.review_status != ReviewStatus::PendingFinalApproval {
            return Err(self.invalid_transition(WorkflowAction::FinalApproval));
        }

        match decision {
            ReviewDecision::Approved => {
                self.transition_review(ReviewStatus::Approved, WorkflowAction::FinalApproval)?;
            }
            ReviewDecision::ChangesRequested => {
                let revision_comment = comment.ok_or(TaskDomainError::CommentRequired)?;
                self.request_changes(
                    actor.user_id(),
                    revision_comment,
                    WorkflowAction::FinalApproval,
                    clock,
                )?;
            }
        }
        self.touch(clock);
        Ok(())
    }

    /// Reopens an approved task by requesting further changes.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::PermissionDenied`] when the caller is
    /// neither the creator nor an administrator, or
    /// [`TaskDomainError::InvalidTransition`] when the task is not approved.
    pub fn reopen(
        &mut self,
        actor: &Actor,
        comment: CommentText,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        if actor.user_id() != self.created_by && !actor.is_admin() {
            return Err(self.permission_denied(actor, WorkflowAction::Reopen));
        }
        if self.review_status != ReviewStatus::Approved {
            return Err(self.invalid_transition(WorkflowAction::Reopen));
        }

        self.request_changes(actor.user_id(), comment, WorkflowAction::Reopen, clock)?;
        self.touch(clock);
        Ok(())
    }

    /// Appends a comment to the task thread and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::PermissionDenied`] when the caller is
    /// neither a participant nor an administrator.
    pub fn post_comment(
        &mut self,
        actor: &Actor,
        text: CommentText,
        clock: &impl Clock,
    ) -> Result<TaskComment, TaskDomainError> {
        if !self.is_participant(actor.user_id()) && !actor.is_admin() {
            return Err(self.permission_denied(actor, WorkflowAction::Comment));
        }

        let comment = TaskComment::new(actor.user_id(), text, clock);
        self.comments.push(comment.clone());
        self.touch(clock);
        Ok(comment)
    }

    /// Records a nudge towards whoever currently owes a review decision.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::PermissionDenied`] when the caller is not
    /// an assignee, the creator, or an administrator;
    /// [`TaskDomainError::InvalidTransition`] when no decision is pending;
    /// or [`TaskDomainError::NudgeRateLimited`] when the cooldown has not
    /// elapsed since the previous nudge.
    pub fn record_nudge(&mut self, actor: &Actor, clock: &impl Clock) -> Result<(), TaskDomainError> {
        let caller = actor.user_id();
        if !self.is_assignee(caller) && caller != self.created_by && !actor.is_admin() {
            return Err(self.permission_denied(actor, WorkflowAction::Nudge));
        }
        if !matches!(
            self.review_status,
            ReviewStatus::PendingReview | ReviewStatus::PendingFinalApproval
        ) {
            return Err(self.invalid_transition(WorkflowAction::Nudge));
        }

        let now = clock.utc();
        if let Some(previous) = self.last_nudged_at {
            let elapsed_ms = now.signed_duration_since(previous).num_milliseconds();
            let cooldown_ms = NUDGE_COOLDOWN_SECS.saturating_mul(1000);
            if elapsed_ms < cooldown_ms {
                let remaining_ms = cooldown_ms.saturating_sub(elapsed_ms);
                let retry_after_secs = u64::try_from(remaining_ms).unwrap_or(0).div_ceil(1000);
                return Err(TaskDomainError::NudgeRateLimited {
                    task_id: self.id,
                    retry_after_secs,
                });
            }
        }

        self.last_nudged_at = Some(now);
        self.updated_at = now;
        Ok(())
    }

    /// Replaces the checklist and recomputes the display status.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::PermissionDenied`] when the caller is
    /// neither a participant nor an administrator.
    pub fn set_checklist(
        &mut self,
        actor: &Actor,
        checklist: TodoChecklist,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        if !self.is_participant(actor.user_id()) && !actor.is_admin() {
            return Err(self.permission_denied(actor, WorkflowAction::EditChecklist));
        }

        self.todo_checklist = checklist;
        self.recompute_status();
        self.touch(clock);
        Ok(())
    }

    /// Sets one checklist item's completion flag and recomputes the display
    /// status.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::PermissionDenied`] when the caller is
    /// neither a participant nor an administrator, or
    /// [`TaskDomainError::ChecklistItemNotFound`] when the item does not
    /// exist.
    pub fn set_item_completed(
        &mut self,
        actor: &Actor,
        item_id: ChecklistItemId,
        completed: bool,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        if !self.is_participant(actor.user_id()) && !actor.is_admin() {
            return Err(self.permission_denied(actor, WorkflowAction::EditChecklist));
        }

        self.todo_checklist.set_item_completed(item_id, completed)?;
        self.recompute_status();
        self.touch(clock);
        Ok(())
    }

    pub(crate) const fn set_version(&mut self, version: u64) {
        self.version = version;
    }

    /// Applies a review transition after checking it against the edge set.
    fn transition_review(
        &mut self,
        target: ReviewStatus,
        action: WorkflowAction,
    ) -> Result<(), TaskDomainError> {
        if !self.review_status.can_transition_to(target) {
            return Err(self.invalid_transition(action));
        }
        self.review_status = target;
        Ok(())
    }

    /// Moves the task into `ChangesRequested`, appending one revision entry.
    fn request_changes(
        &mut self,
        made_by: UserId,
        comment: CommentText,
        action: WorkflowAction,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.transition_review(ReviewStatus::ChangesRequested, action)?;
        self.revision_history
            .push(RevisionEntry::new(comment, made_by, clock));
        Ok(())
    }

    /// Recomputes the derived display status from the checklist. Never reads
    /// or writes `review_status`.
    fn recompute_status(&mut self) {
        self.status = TaskStatus::from_checklist(&self.todo_checklist);
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }

    const fn permission_denied(&self, actor: &Actor, action: WorkflowAction) -> TaskDomainError {
        TaskDomainError::PermissionDenied {
            task_id: self.id,
            user_id: actor.user_id(),
            action,
        }
    }

    const fn invalid_transition(&self, action: WorkflowAction) -> TaskDomainError {
        TaskDomainError::InvalidTransition {
            task_id: self.id,
            from: self.review_status,
            action,
        }
    }
}
