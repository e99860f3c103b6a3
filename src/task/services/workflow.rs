//! Review workflow orchestration service.
//!
//! All review decisions flow through one tagged entry point,
//! [`ReviewWorkflowService::apply_decision`], which validates the request
//! against the transition table instead of routing near-duplicate endpoints
//! ad hoc. Notifications are published only after the mutation persisted and
//! never fail the operation.

use crate::notification::{
    domain::RealtimeEvent,
    ports::NotificationPublisher,
    services::{
        Notifier, TEMPLATE_CHANGES_REQUESTED, TEMPLATE_FINAL_APPROVED, TEMPLATE_PEER_APPROVED,
        TEMPLATE_REVIEWER_NUDGED, TEMPLATE_REVIEW_SUBMITTED, TEMPLATE_TASK_ASSIGNED,
        TEMPLATE_TASK_REOPENED,
    },
};
use crate::task::{
    domain::{
        Actor, ChecklistItem, ChecklistItemId, CommentText, ReviewDecision, ReviewStatus, Task,
        TaskDomainError, TaskDraft, TaskId, TaskPriority, TaskTitle, TodoChecklist, UserId,
        WorkflowAction,
    },
    ports::{TaskRepository, TaskRepositoryError},
};
use chrono::{DateTime, Utc};
use minijinja::context;
use mockable::Clock;
use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    title: String,
    description: Option<String>,
    priority: TaskPriority,
    due_date: Option<DateTime<Utc>>,
    created_by: UserId,
    assigned_to: Vec<UserId>,
    reviewers: Vec<UserId>,
    checklist: Vec<String>,
}

impl CreateTaskRequest {
    /// Creates a request with required fields.
    #[must_use]
    pub fn new(title: impl Into<String>, created_by: UserId) -> Self {
        Self {
            title: title.into(),
            description: None,
            priority: TaskPriority::default(),
            due_date: None,
            created_by,
            assigned_to: Vec::new(),
            reviewers: Vec::new(),
            checklist: Vec::new(),
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

    /// Sets the assignees.
    #[must_use]
    pub fn with_assignees(mut self, assignees: impl IntoIterator<Item = UserId>) -> Self {
        self.assigned_to = assignees.into_iter().collect();
        self
    }

    /// Sets the peer reviewers.
    #[must_use]
    pub fn with_reviewers(mut self, reviewers: impl IntoIterator<Item = UserId>) -> Self {
        self.reviewers = reviewers.into_iter().collect();
        self
    }

    /// Sets the initial checklist item texts.
    #[must_use]
    pub fn with_checklist(mut self, items: impl IntoIterator<Item = String>) -> Self {
        self.checklist = items.into_iter().collect();
        self
    }
}

/// One checklist entry in a checklist replacement request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecklistItemInput {
    text: String,
    completed: bool,
}

impl ChecklistItemInput {
    /// Creates an incomplete entry.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            completed: false,
        }
    }

    /// Sets the completion flag.
    #[must_use]
    pub const fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }
}

/// Tagged review transition request.
///
/// Carries the review state the client acted on so a decision raced by a
/// concurrent transition is rejected instead of silently applying to a state
/// it was never meant for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewTransitionRequest {
    expected_status: ReviewStatus,
    decision: ReviewDecision,
    comment: Option<String>,
}

impl ReviewTransitionRequest {
    /// Creates a transition request.
    #[must_use]
    pub const fn new(expected_status: ReviewStatus, decision: ReviewDecision) -> Self {
        Self {
            expected_status,
            decision,
            comment: None,
        }
    }

    /// Attaches the comment required by changes-requested decisions.
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// Service-level errors for review workflow operations.
#[derive(Debug, Error)]
pub enum TaskWorkflowError {
    /// Domain validation or guard failure.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Repository operation failure.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
    /// The task does not exist.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),
    /// The request was built against a review state that has since changed.
    #[error("stale transition on task {task_id}: expected '{expected}', current '{actual}'")]
    StaleTransition {
        /// The task the request targeted.
        task_id: TaskId,
        /// The review state the client acted on.
        expected: ReviewStatus,
        /// The review state actually stored.
        actual: ReviewStatus,
    },
}

/// Result type for review workflow operations.
pub type TaskWorkflowResult<T> = Result<T, TaskWorkflowError>;

/// Review workflow orchestration service.
pub struct ReviewWorkflowService<R, P, C>
where
    R: TaskRepository,
    P: NotificationPublisher,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    notifier: Notifier<P>,
    clock: Arc<C>,
}

impl<R, P, C> ReviewWorkflowService<R, P, C>
where
    R: TaskRepository,
    P: NotificationPublisher,
    C: Clock + Send + Sync,
{
    /// Creates a new review workflow service.
    #[must_use]
    pub const fn new(repository: Arc<R>, notifier: Notifier<P>, clock: Arc<C>) -> Self {
        Self {
            repository,
            notifier,
            clock,
        }
    }

    /// Creates a task and notifies its assignees.
    ///
    /// # Errors
    ///
    /// Returns [`TaskWorkflowError`] when input validation fails or the
    /// repository rejects persistence.
    pub async fn create_task(&self, request: CreateTaskRequest) -> TaskWorkflowResult<Task> {
        let title = TaskTitle::new(request.title)?;
        let items = request
            .checklist
            .into_iter()
            .map(ChecklistItem::new)
            .collect::<Result<Vec<_>, _>>()?;

        let mut draft = TaskDraft::new(title, request.created_by)
            .with_priority(request.priority)
            .with_assignees(request.assigned_to)
            .with_reviewers(request.reviewers)
            .with_checklist(TodoChecklist::from_items(items));
        if let Some(description) = request.description {
            draft = draft.with_description(description);
        }
        if let Some(due_date) = request.due_date {
            draft = draft.with_due_date(due_date);
        }

        let task = Task::new(draft, &*self.clock);
        self.repository.store(&task).await?;
        tracing::info!(task_id = %task.id(), "task created");

        self.notifier
            .notify(
                task.assigned_to().iter().copied(),
                TEMPLATE_TASK_ASSIGNED,
                context! { title => task.title().as_str() },
                &task_link(task.id()),
            )
            .await;
        Ok(task)
    }

    /// Retrieves a task by identifier.
    ///
    /// Returns `Ok(None)` when the task does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`TaskWorkflowError::Repository`] when the lookup fails.
    pub async fn get_task(&self, task_id: TaskId) -> TaskWorkflowResult<Option<Task>> {
        Ok(self.repository.find_by_id(task_id).await?)
    }

    /// Returns all tasks assigned to the given user.
    ///
    /// # Errors
    ///
    /// Returns [`TaskWorkflowError::Repository`] when the lookup fails.
    pub async fn list_assigned_to(&self, user_id: UserId) -> TaskWorkflowResult<Vec<Task>> {
        Ok(self.repository.list_assigned_to(user_id).await?)
    }

    /// Submits a task for review on behalf of an assignee.
    ///
    /// Routes to peer review when reviewers are assigned, otherwise directly
    /// to final approval, and notifies whoever now owes a decision.
    ///
    /// # Errors
    ///
    /// Returns [`TaskWorkflowError`] when the task is missing, the guard
    /// rejects the caller, the state has no submit edge, or persistence
    /// fails.
    pub async fn submit_for_review(
        &self,
        task_id: TaskId,
        actor: &Actor,
    ) -> TaskWorkflowResult<Task> {
        let mut task = self.load(task_id).await?;
        let from = task.review_status();
        task.submit_for_review(actor, &*self.clock)?;
        let updated = self.repository.update(&task).await?;
        tracing::info!(
            task_id = %task_id,
            from = %from,
            to = %updated.review_status(),
            "task submitted for review"
        );

        let recipients = if updated.review_status() == ReviewStatus::PendingReview {
            updated.reviewers().clone()
        } else {
            BTreeSet::from([updated.created_by()])
        };
        self.notifier
            .notify(
                without(recipients, actor.user_id()),
                TEMPLATE_REVIEW_SUBMITTED,
                context! { title => updated.title().as_str() },
                &task_link(task_id),
            )
            .await;
        Ok(updated)
    }

    /// Applies a tagged review decision: peer review, final approval, or
    /// reopening an approved task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskWorkflowError::StaleTransition`] when the stored review
    /// state no longer matches the request, or [`TaskWorkflowError`] when
    /// the task is missing, a guard rejects the caller, the decision has no
    /// edge from the current state, or persistence fails.
    pub async fn apply_decision(
        &self,
        task_id: TaskId,
        actor: &Actor,
        request: ReviewTransitionRequest,
    ) -> TaskWorkflowResult<Task> {
        let mut task = self.load(task_id).await?;
        let current = task.review_status();
        if current != request.expected_status {
            return Err(TaskWorkflowError::StaleTransition {
                task_id,
                expected: request.expected_status,
                actual: current,
            });
        }

        let comment = request.comment.map(CommentText::new).transpose()?;

        match current {
            ReviewStatus::PendingReview => {
                task.record_peer_review(actor, request.decision, comment, &*self.clock)?;
            }
            ReviewStatus::PendingFinalApproval => {
                task.record_final_decision(actor, request.decision, comment, &*self.clock)?;
            }
            ReviewStatus::Approved if request.decision == ReviewDecision::ChangesRequested => {
                let reopen_comment = comment.ok_or(TaskDomainError::CommentRequired)?;
                task.reopen(actor, reopen_comment, &*self.clock)?;
            }
            ReviewStatus::Approved => {
                return Err(TaskDomainError::InvalidTransition {
                    task_id,
                    from: current,
                    action: WorkflowAction::FinalApproval,
                }
                .into());
            }
            ReviewStatus::NotSubmitted | ReviewStatus::ChangesRequested => {
                return Err(TaskDomainError::InvalidTransition {
                    task_id,
                    from: current,
                    action: WorkflowAction::PeerReview,
                }
                .into());
            }
        }

        let updated = self.repository.update(&task).await?;
        tracing::info!(
            task_id = %task_id,
            from = %current,
            to = %updated.review_status(),
            decision = %request.decision,
            "review decision applied"
        );
        self.notify_decision(&updated, current, actor).await;
        Ok(updated)
    }

    /// Nudges whoever currently owes a review decision, at most once per
    /// cooldown window.
    ///
    /// # Errors
    ///
    /// Returns [`TaskWorkflowError`] when the task is missing, no decision
    /// is pending, the caller may not nudge, the cooldown has not elapsed,
    /// or persistence fails.
    pub async fn nudge(&self, task_id: TaskId, actor: &Actor) -> TaskWorkflowResult<Task> {
        let mut task = self.load(task_id).await?;
        task.record_nudge(actor, &*self.clock)?;
        let updated = self.repository.update(&task).await?;

        let recipients = if updated.review_status() == ReviewStatus::PendingReview {
            updated.reviewers().clone()
        } else {
            BTreeSet::from([updated.created_by()])
        };
        self.notifier
            .notify(
                without(recipients, actor.user_id()),
                TEMPLATE_REVIEWER_NUDGED,
                context! { title => updated.title().as_str() },
                &task_link(task_id),
            )
            .await;
        Ok(updated)
    }

    /// Posts a comment to the task thread and pushes it to the other
    /// participants.
    ///
    /// # Errors
    ///
    /// Returns [`TaskWorkflowError`] when the task is missing, the comment
    /// is empty, the caller is not a participant, or persistence fails.
    pub async fn post_comment(
        &self,
        task_id: TaskId,
        actor: &Actor,
        text: impl Into<String> + Send,
    ) -> TaskWorkflowResult<Task> {
        let comment_text = CommentText::new(text)?;
        let mut task = self.load(task_id).await?;
        let comment = task.post_comment(actor, comment_text, &*self.clock)?;
        let updated = self.repository.update(&task).await?;

        self.notifier
            .broadcast(
                without(updated.participants(), actor.user_id()),
                RealtimeEvent::new_comment(task_id, comment),
            )
            .await;
        Ok(updated)
    }

    /// Replaces the task checklist; the display status is recomputed from
    /// the new completion ratio.
    ///
    /// # Errors
    ///
    /// Returns [`TaskWorkflowError`] when the task is missing, an item text
    /// is empty, the caller is not a participant, or persistence fails.
    pub async fn set_checklist(
        &self,
        task_id: TaskId,
        actor: &Actor,
        items: Vec<ChecklistItemInput>,
    ) -> TaskWorkflowResult<Task> {
        let checklist_items = items
            .into_iter()
            .map(|item| ChecklistItem::with_completed(item.text, item.completed))
            .collect::<Result<Vec<_>, _>>()?;

        let mut task = self.load(task_id).await?;
        task.set_checklist(
            actor,
            TodoChecklist::from_items(checklist_items),
            &*self.clock,
        )?;
        Ok(self.repository.update(&task).await?)
    }

    /// Sets one checklist item's completion flag; the display status is
    /// recomputed.
    ///
    /// # Errors
    ///
    /// Returns [`TaskWorkflowError`] when the task or item is missing, the
    /// caller is not a participant, or persistence fails.
    pub async fn set_item_completed(
        &self,
        task_id: TaskId,
        actor: &Actor,
        item_id: ChecklistItemId,
        completed: bool,
    ) -> TaskWorkflowResult<Task> {
        let mut task = self.load(task_id).await?;
        task.set_item_completed(actor, item_id, completed, &*self.clock)?;
        Ok(self.repository.update(&task).await?)
    }

    /// Removes a task record. Administrative action restricted to the
    /// creator or an administrator; unrelated to the review workflow.
    ///
    /// # Errors
    ///
    /// Returns [`TaskWorkflowError`] when the task is missing, the caller
    /// may not delete it, or persistence fails.
    pub async fn delete_task(&self, task_id: TaskId, actor: &Actor) -> TaskWorkflowResult<()> {
        let task = self.load(task_id).await?;
        if actor.user_id() != task.created_by() && !actor.is_admin() {
            return Err(TaskDomainError::PermissionDenied {
                task_id,
                user_id: actor.user_id(),
                action: WorkflowAction::Delete,
            }
            .into());
        }
        self.repository.delete(task_id).await?;
        tracing::info!(task_id = %task_id, "task deleted");
        Ok(())
    }

    async fn load(&self, task_id: TaskId) -> TaskWorkflowResult<Task> {
        self.repository
            .find_by_id(task_id)
            .await?
            .ok_or(TaskWorkflowError::TaskNotFound(task_id))
    }

    /// Publishes the notification matching a decision's landing state.
    async fn notify_decision(&self, updated: &Task, from: ReviewStatus, actor: &Actor) {
        let link = task_link(updated.id());
        let title = updated.title().as_str();
        match updated.review_status() {
            ReviewStatus::PendingFinalApproval => {
                self.notifier
                    .notify(
                        without(BTreeSet::from([updated.created_by()]), actor.user_id()),
                        TEMPLATE_PEER_APPROVED,
                        context! { title },
                        &link,
                    )
                    .await;
            }
            ReviewStatus::Approved => {
                let mut recipients = updated.assigned_to().clone();
                recipients.extend(updated.reviewers().iter().copied());
                self.notifier
                    .notify(
                        without(recipients, actor.user_id()),
                        TEMPLATE_FINAL_APPROVED,
                        context! { title },
                        &link,
                    )
                    .await;
            }
            ReviewStatus::ChangesRequested => {
                let comment = updated
                    .revision_history()
                    .last()
                    .map(|entry| entry.comment().as_str().to_owned())
                    .unwrap_or_default();
                let (template, recipients) = if from == ReviewStatus::Approved {
                    let mut everyone = updated.assigned_to().clone();
                    everyone.extend(updated.reviewers().iter().copied());
                    (TEMPLATE_TASK_REOPENED, everyone)
                } else {
                    (TEMPLATE_CHANGES_REQUESTED, updated.assigned_to().clone())
                };
                self.notifier
                    .notify(
                        without(recipients, actor.user_id()),
                        template,
                        context! { title, comment },
                        &link,
                    )
                    .await;
            }
            ReviewStatus::NotSubmitted | ReviewStatus::PendingReview => {}
        }
    }
}

impl<R, P, C> Clone for ReviewWorkflowService<R, P, C>
where
    R: TaskRepository,
    P: NotificationPublisher,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            notifier: self.notifier.clone(),
            clock: Arc::clone(&self.clock),
        }
    }
}

/// Client route for a task detail view.
fn task_link(task_id: TaskId) -> String {
    format!("/tasks/{task_id}")
}

/// Removes the acting user from a recipient set.
fn without(mut recipients: BTreeSet<UserId>, actor: UserId) -> BTreeSet<UserId> {
    recipients.remove(&actor);
    recipients
}
