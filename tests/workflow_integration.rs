//! End-to-end workflow integration over the public API with in-memory
//! adapters: review transitions, realtime delivery, and comment fan-out.

use std::sync::Arc;

use atelier::notification::{
    adapters::memory::NotificationHub, domain::RealtimeEvent, services::Notifier,
};
use atelier::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{Actor, ReviewDecision, ReviewStatus, UserId},
    services::{CreateTaskRequest, ReviewTransitionRequest, ReviewWorkflowService},
};
use mockable::DefaultClock;

type WorkflowService = ReviewWorkflowService<InMemoryTaskRepository, NotificationHub, DefaultClock>;

fn build_service() -> (WorkflowService, NotificationHub) {
    let hub = NotificationHub::new();
    let notifier = Notifier::new(Arc::new(hub.clone())).expect("templates should parse");
    let service = ReviewWorkflowService::new(
        Arc::new(InMemoryTaskRepository::new()),
        notifier,
        Arc::new(DefaultClock),
    );
    (service, hub)
}

#[tokio::test(flavor = "multi_thread")]
async fn review_chain_delivers_notifications_at_each_stage() {
    let (service, hub) = build_service();
    let creator = UserId::new();
    let assignee = UserId::new();
    let reviewer = UserId::new();
    let mut reviewer_events = hub.connect(reviewer);
    let mut creator_events = hub.connect(creator);
    let mut assignee_events = hub.connect(assignee);

    let task = service
        .create_task(
            CreateTaskRequest::new("Quarterly newsletter", creator)
                .with_assignees([assignee])
                .with_reviewers([reviewer]),
        )
        .await
        .expect("creation should succeed");
    assert!(assignee_events.try_recv().is_some());

    service
        .submit_for_review(task.id(), &Actor::member(assignee))
        .await
        .expect("submit should succeed");
    let reviewer_event = reviewer_events
        .try_recv()
        .expect("reviewer should hear about the submission");
    assert!(matches!(reviewer_event, RealtimeEvent::Notification { .. }));

    service
        .apply_decision(
            task.id(),
            &Actor::member(reviewer),
            ReviewTransitionRequest::new(ReviewStatus::PendingReview, ReviewDecision::Approved),
        )
        .await
        .expect("peer approval should succeed");
    assert!(creator_events.try_recv().is_some());

    let approved = service
        .apply_decision(
            task.id(),
            &Actor::member(creator),
            ReviewTransitionRequest::new(
                ReviewStatus::PendingFinalApproval,
                ReviewDecision::Approved,
            ),
        )
        .await
        .expect("final approval should succeed");
    assert_eq!(approved.review_status(), ReviewStatus::Approved);
    assert!(assignee_events.try_recv().is_some());
    assert!(reviewer_events.try_recv().is_some());
}

#[tokio::test(flavor = "multi_thread")]
async fn offline_participants_simply_miss_events() {
    let (service, hub) = build_service();
    let creator = UserId::new();
    let assignee = UserId::new();

    let task = service
        .create_task(
            CreateTaskRequest::new("Quiet launch", creator).with_assignees([assignee]),
        )
        .await
        .expect("creation should succeed");

    // Nobody is connected; the transition still succeeds and the change is
    // discoverable on the next fetch.
    let submitted = service
        .submit_for_review(task.id(), &Actor::member(assignee))
        .await
        .expect("submit should succeed");
    assert_eq!(submitted.review_status(), ReviewStatus::PendingFinalApproval);

    let mut late_events = hub.connect(creator);
    assert!(late_events.try_recv().is_none());
    let stored = service
        .get_task(task.id())
        .await
        .expect("lookup should succeed")
        .expect("task should exist");
    assert_eq!(stored.review_status(), ReviewStatus::PendingFinalApproval);
}

#[tokio::test(flavor = "multi_thread")]
async fn comments_fan_out_to_connected_participants() {
    let (service, hub) = build_service();
    let creator = UserId::new();
    let assignee = UserId::new();

    let task = service
        .create_task(
            CreateTaskRequest::new("Comment thread", creator).with_assignees([assignee]),
        )
        .await
        .expect("creation should succeed");
    let mut creator_events = hub.connect(creator);

    service
        .post_comment(task.id(), &Actor::member(assignee), "first draft attached")
        .await
        .expect("comment should succeed");

    let event = creator_events.try_recv().expect("creator should be notified");
    let RealtimeEvent::NewComment { task_id, comment } = event else {
        panic!("expected new_comment event, got {event:?}");
    };
    assert_eq!(task_id, task.id());
    assert_eq!(comment.text().as_str(), "first draft attached");
    assert_eq!(comment.author(), assignee);
}

#[tokio::test(flavor = "multi_thread")]
async fn disconnect_stops_delivery_without_failing_transitions() {
    let (service, hub) = build_service();
    let creator = UserId::new();
    let assignee = UserId::new();

    let task = service
        .create_task(
            CreateTaskRequest::new("Disconnect drill", creator).with_assignees([assignee]),
        )
        .await
        .expect("creation should succeed");

    let mut creator_events = hub.connect(creator);
    hub.disconnect(creator);

    service
        .submit_for_review(task.id(), &Actor::member(assignee))
        .await
        .expect("submit should succeed after disconnect");
    assert!(creator_events.recv().await.is_none());
}
