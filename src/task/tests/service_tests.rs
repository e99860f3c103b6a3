//! Service orchestration tests for the review workflow.

use std::sync::Arc;

use super::support::SteppingClock;
use crate::notification::{
    adapters::memory::NotificationHub,
    domain::RealtimeEvent,
    ports::publisher::{MockNotificationPublisher, NotificationPublishError},
    services::Notifier,
};
use crate::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{
        Actor, NUDGE_COOLDOWN_SECS, ReviewDecision, ReviewStatus, TaskDomainError, UserId,
    },
    ports::{TaskRepository, TaskRepositoryError},
    services::{
        ChecklistItemInput, CreateTaskRequest, ReviewTransitionRequest, ReviewWorkflowService,
        TaskWorkflowError,
    },
};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

type TestService = ReviewWorkflowService<InMemoryTaskRepository, NotificationHub, DefaultClock>;

struct Crew {
    creator: UserId,
    assignee: UserId,
    reviewer: UserId,
}

#[fixture]
fn crew() -> Crew {
    Crew {
        creator: UserId::new(),
        assignee: UserId::new(),
        reviewer: UserId::new(),
    }
}

#[fixture]
fn harness() -> (TestService, NotificationHub) {
    let hub = NotificationHub::new();
    let notifier = Notifier::new(Arc::new(hub.clone())).expect("templates should parse");
    let service = ReviewWorkflowService::new(
        Arc::new(InMemoryTaskRepository::new()),
        notifier,
        Arc::new(DefaultClock),
    );
    (service, hub)
}

fn create_request(crew: &Crew) -> CreateTaskRequest {
    CreateTaskRequest::new("Ship the onboarding flow", crew.creator)
        .with_assignees([crew.assignee])
        .with_reviewers([crew.reviewer])
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_task_persists_and_notifies_assignees(crew: Crew, harness: (TestService, NotificationHub)) {
    let (service, hub) = harness;
    let mut assignee_events = hub.connect(crew.assignee);

    let created = service
        .create_task(create_request(&crew).with_checklist(vec!["write copy".to_owned()]))
        .await
        .expect("task creation should succeed");

    let fetched = service
        .get_task(created.id())
        .await
        .expect("lookup should succeed");
    assert_eq!(fetched, Some(created.clone()));

    let event = assignee_events.try_recv().expect("assignee should be notified");
    let RealtimeEvent::Notification { message, link } = event else {
        panic!("expected notification event, got {event:?}");
    };
    assert!(message.contains("Ship the onboarding flow"));
    assert_eq!(link, format!("/tasks/{}", created.id()));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_task_with_blank_title_is_rejected(crew: Crew, harness: (TestService, NotificationHub)) {
    let (service, _hub) = harness;

    let result = service
        .create_task(CreateTaskRequest::new("   ", crew.creator))
        .await;

    assert!(matches!(
        result,
        Err(TaskWorkflowError::Domain(TaskDomainError::EmptyTitle))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn full_review_walk_reaches_approved(crew: Crew, harness: (TestService, NotificationHub)) {
    let (service, _hub) = harness;
    let task = service
        .create_task(create_request(&crew))
        .await
        .expect("task creation should succeed");

    let submitted = service
        .submit_for_review(task.id(), &Actor::member(crew.assignee))
        .await
        .expect("submit should succeed");
    assert_eq!(submitted.review_status(), ReviewStatus::PendingReview);
    assert_eq!(submitted.version(), 2);

    let peer_approved = service
        .apply_decision(
            task.id(),
            &Actor::member(crew.reviewer),
            ReviewTransitionRequest::new(ReviewStatus::PendingReview, ReviewDecision::Approved),
        )
        .await
        .expect("peer approval should succeed");
    assert_eq!(
        peer_approved.review_status(),
        ReviewStatus::PendingFinalApproval
    );

    let approved = service
        .apply_decision(
            task.id(),
            &Actor::member(crew.creator),
            ReviewTransitionRequest::new(
                ReviewStatus::PendingFinalApproval,
                ReviewDecision::Approved,
            ),
        )
        .await
        .expect("final approval should succeed");
    assert_eq!(approved.review_status(), ReviewStatus::Approved);
    assert_eq!(approved.revision_count(), 0);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn submit_without_reviewers_skips_peer_review(crew: Crew, harness: (TestService, NotificationHub)) {
    let (service, _hub) = harness;
    let task = service
        .create_task(
            CreateTaskRequest::new("Solo deliverable", crew.creator)
                .with_assignees([crew.assignee]),
        )
        .await
        .expect("task creation should succeed");

    let submitted = service
        .submit_for_review(task.id(), &Actor::member(crew.assignee))
        .await
        .expect("submit should succeed");

    assert_eq!(submitted.review_status(), ReviewStatus::PendingFinalApproval);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stale_expected_status_is_rejected(crew: Crew, harness: (TestService, NotificationHub)) {
    let (service, _hub) = harness;
    let task = service
        .create_task(create_request(&crew))
        .await
        .expect("task creation should succeed");
    service
        .submit_for_review(task.id(), &Actor::member(crew.assignee))
        .await
        .expect("submit should succeed");

    // Built against the pre-submit state, so the tagged check must reject it.
    let result = service
        .apply_decision(
            task.id(),
            &Actor::member(crew.creator),
            ReviewTransitionRequest::new(
                ReviewStatus::PendingFinalApproval,
                ReviewDecision::Approved,
            ),
        )
        .await;

    assert!(matches!(
        result,
        Err(TaskWorkflowError::StaleTransition {
            expected: ReviewStatus::PendingFinalApproval,
            actual: ReviewStatus::PendingReview,
            ..
        })
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn changes_request_without_comment_leaves_stored_state_unchanged(
    crew: Crew,
    harness: (TestService, NotificationHub),
) {
    let (service, _hub) = harness;
    let task = service
        .create_task(create_request(&crew))
        .await
        .expect("task creation should succeed");
    service
        .submit_for_review(task.id(), &Actor::member(crew.assignee))
        .await
        .expect("submit should succeed");

    let result = service
        .apply_decision(
            task.id(),
            &Actor::member(crew.reviewer),
            ReviewTransitionRequest::new(
                ReviewStatus::PendingReview,
                ReviewDecision::ChangesRequested,
            ),
        )
        .await;

    assert!(matches!(
        result,
        Err(TaskWorkflowError::Domain(TaskDomainError::CommentRequired))
    ));
    let stored = service
        .get_task(task.id())
        .await
        .expect("lookup should succeed")
        .expect("task should exist");
    assert_eq!(stored.review_status(), ReviewStatus::PendingReview);
    assert_eq!(stored.revision_count(), 0);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn changes_request_notifies_assignees_with_comment(
    crew: Crew,
    harness: (TestService, NotificationHub),
) {
    let (service, hub) = harness;
    let task = service
        .create_task(create_request(&crew))
        .await
        .expect("task creation should succeed");
    service
        .submit_for_review(task.id(), &Actor::member(crew.assignee))
        .await
        .expect("submit should succeed");
    let mut assignee_events = hub.connect(crew.assignee);

    let updated = service
        .apply_decision(
            task.id(),
            &Actor::member(crew.reviewer),
            ReviewTransitionRequest::new(
                ReviewStatus::PendingReview,
                ReviewDecision::ChangesRequested,
            )
            .with_comment("please add error handling"),
        )
        .await
        .expect("changes request should succeed");

    assert_eq!(updated.review_status(), ReviewStatus::ChangesRequested);
    assert_eq!(updated.revision_count(), 1);
    let event = assignee_events.try_recv().expect("assignee should be notified");
    let RealtimeEvent::Notification { message, .. } = event else {
        panic!("expected notification event, got {event:?}");
    };
    assert!(message.contains("please add error handling"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn admin_reopen_records_revision(crew: Crew, harness: (TestService, NotificationHub)) {
    let (service, _hub) = harness;
    let task = service
        .create_task(
            CreateTaskRequest::new("Release notes", crew.creator).with_assignees([crew.assignee]),
        )
        .await
        .expect("task creation should succeed");
    service
        .submit_for_review(task.id(), &Actor::member(crew.assignee))
        .await
        .expect("submit should succeed");
    service
        .apply_decision(
            task.id(),
            &Actor::member(crew.creator),
            ReviewTransitionRequest::new(
                ReviewStatus::PendingFinalApproval,
                ReviewDecision::Approved,
            ),
        )
        .await
        .expect("final approval should succeed");

    let reopened = service
        .apply_decision(
            task.id(),
            &Actor::admin(UserId::new()),
            ReviewTransitionRequest::new(ReviewStatus::Approved, ReviewDecision::ChangesRequested)
                .with_comment("regression found"),
        )
        .await
        .expect("reopen should succeed");

    assert_eq!(reopened.review_status(), ReviewStatus::ChangesRequested);
    assert_eq!(reopened.revision_count(), 1);
    let entry = reopened
        .revision_history()
        .last()
        .expect("revision entry should exist");
    assert_eq!(entry.comment().as_str(), "regression found");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn approving_an_approved_task_is_rejected(crew: Crew, harness: (TestService, NotificationHub)) {
    let (service, _hub) = harness;
    let task = service
        .create_task(
            CreateTaskRequest::new("Release notes", crew.creator).with_assignees([crew.assignee]),
        )
        .await
        .expect("task creation should succeed");
    service
        .submit_for_review(task.id(), &Actor::member(crew.assignee))
        .await
        .expect("submit should succeed");
    service
        .apply_decision(
            task.id(),
            &Actor::member(crew.creator),
            ReviewTransitionRequest::new(
                ReviewStatus::PendingFinalApproval,
                ReviewDecision::Approved,
            ),
        )
        .await
        .expect("final approval should succeed");

    let result = service
        .apply_decision(
            task.id(),
            &Actor::member(crew.creator),
            ReviewTransitionRequest::new(ReviewStatus::Approved, ReviewDecision::Approved),
        )
        .await;

    assert!(matches!(
        result,
        Err(TaskWorkflowError::Domain(
            TaskDomainError::InvalidTransition {
                from: ReviewStatus::Approved,
                ..
            }
        ))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn nudge_is_rate_limited_within_cooldown(crew: Crew) {
    let hub = NotificationHub::new();
    let notifier = Notifier::new(Arc::new(hub.clone())).expect("templates should parse");
    let clock = Arc::new(SteppingClock::fixed());
    let service = ReviewWorkflowService::new(
        Arc::new(InMemoryTaskRepository::new()),
        notifier,
        Arc::clone(&clock),
    );
    let task = service
        .create_task(create_request(&crew))
        .await
        .expect("task creation should succeed");
    service
        .submit_for_review(task.id(), &Actor::member(crew.assignee))
        .await
        .expect("submit should succeed");
    let mut reviewer_events = hub.connect(crew.reviewer);

    service
        .nudge(task.id(), &Actor::member(crew.assignee))
        .await
        .expect("first nudge should succeed");
    clock.advance_secs(60);
    let result = service.nudge(task.id(), &Actor::member(crew.assignee)).await;

    assert!(matches!(
        result,
        Err(TaskWorkflowError::Domain(
            TaskDomainError::NudgeRateLimited { retry_after_secs, .. }
        )) if retry_after_secs == u64::try_from(NUDGE_COOLDOWN_SECS - 60).unwrap_or_default()
    ));
    assert!(reviewer_events.try_recv().is_some());
    assert!(reviewer_events.try_recv().is_none());

    clock.advance_secs(NUDGE_COOLDOWN_SECS);
    service
        .nudge(task.id(), &Actor::member(crew.assignee))
        .await
        .expect("nudge after cooldown should succeed");
    assert!(reviewer_events.try_recv().is_some());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn post_comment_reaches_other_participants_only(
    crew: Crew,
    harness: (TestService, NotificationHub),
) {
    let (service, hub) = harness;
    let task = service
        .create_task(create_request(&crew))
        .await
        .expect("task creation should succeed");
    let mut author_events = hub.connect(crew.assignee);
    let mut creator_events = hub.connect(crew.creator);
    let mut reviewer_events = hub.connect(crew.reviewer);

    let updated = service
        .post_comment(task.id(), &Actor::member(crew.assignee), "draft is up")
        .await
        .expect("comment should succeed");

    assert_eq!(updated.comments().len(), 1);
    assert!(author_events.try_recv().is_none());
    for events in [&mut creator_events, &mut reviewer_events] {
        let event = events.try_recv().expect("participant should be notified");
        let RealtimeEvent::NewComment { task_id, comment } = event else {
            panic!("expected new_comment event, got {event:?}");
        };
        assert_eq!(task_id, task.id());
        assert_eq!(comment.text().as_str(), "draft is up");
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn empty_comment_is_rejected(crew: Crew, harness: (TestService, NotificationHub)) {
    let (service, _hub) = harness;
    let task = service
        .create_task(create_request(&crew))
        .await
        .expect("task creation should succeed");

    let result = service
        .post_comment(task.id(), &Actor::member(crew.assignee), "   ")
        .await;

    assert!(matches!(
        result,
        Err(TaskWorkflowError::Domain(TaskDomainError::CommentRequired))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn set_checklist_updates_derived_status(crew: Crew, harness: (TestService, NotificationHub)) {
    let (service, _hub) = harness;
    let task = service
        .create_task(create_request(&crew))
        .await
        .expect("task creation should succeed");

    let updated = service
        .set_checklist(
            task.id(),
            &Actor::member(crew.assignee),
            vec![
                ChecklistItemInput::new("write copy").with_completed(true),
                ChecklistItemInput::new("pick artwork"),
            ],
        )
        .await
        .expect("checklist update should succeed");

    assert_eq!(
        updated.status(),
        crate::task::domain::TaskStatus::InProgress
    );
    assert_eq!(updated.review_status(), ReviewStatus::NotSubmitted);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_task_requires_creator_or_admin(crew: Crew, harness: (TestService, NotificationHub)) {
    let (service, _hub) = harness;
    let task = service
        .create_task(create_request(&crew))
        .await
        .expect("task creation should succeed");

    let denied = service
        .delete_task(task.id(), &Actor::member(crew.assignee))
        .await;
    assert!(matches!(
        denied,
        Err(TaskWorkflowError::Domain(
            TaskDomainError::PermissionDenied { .. }
        ))
    ));

    service
        .delete_task(task.id(), &Actor::admin(UserId::new()))
        .await
        .expect("admin delete should succeed");
    let fetched = service
        .get_task(task.id())
        .await
        .expect("lookup should succeed");
    assert!(fetched.is_none());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn missing_task_surfaces_not_found(crew: Crew, harness: (TestService, NotificationHub)) {
    let (service, _hub) = harness;

    let result = service
        .submit_for_review(crate::task::domain::TaskId::new(), &Actor::member(crew.assignee))
        .await;

    assert!(matches!(result, Err(TaskWorkflowError::TaskNotFound(_))));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn publisher_failure_never_fails_the_transition(crew: Crew) {
    let mut publisher = MockNotificationPublisher::new();
    publisher.expect_publish().returning(|_, _| {
        Err(NotificationPublishError::transport(std::io::Error::other(
            "socket layer down",
        )))
    });
    let notifier = Notifier::new(Arc::new(publisher)).expect("templates should parse");
    let service = ReviewWorkflowService::new(
        Arc::new(InMemoryTaskRepository::new()),
        notifier,
        Arc::new(DefaultClock),
    );

    let task = service
        .create_task(create_request(&crew))
        .await
        .expect("creation should succeed despite publish failures");
    let submitted = service
        .submit_for_review(task.id(), &Actor::member(crew.assignee))
        .await
        .expect("submit should succeed despite publish failures");

    assert_eq!(submitted.review_status(), ReviewStatus::PendingReview);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn repository_update_rejects_stale_versions(crew: Crew) {
    let repository = InMemoryTaskRepository::new();
    let clock = DefaultClock;
    let task = crate::task::domain::Task::new(
        crate::task::domain::TaskDraft::new(
            crate::task::domain::TaskTitle::new("Concurrent edit target").expect("valid title"),
            crew.creator,
        )
        .with_assignees([crew.assignee]),
        &clock,
    );
    repository.store(&task).await.expect("store should succeed");

    let fresh = repository
        .update(&task)
        .await
        .expect("first update should succeed");
    assert_eq!(fresh.version(), 2);

    // Re-sending the version-1 aggregate must now conflict.
    let stale = repository.update(&task).await;
    assert!(matches!(
        stale,
        Err(TaskRepositoryError::VersionConflict { expected: 1, .. })
    ));
}
