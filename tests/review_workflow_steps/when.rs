//! When steps for review workflow BDD scenarios.

use super::world::{ReviewWorkflowWorld, run_async};
use atelier::task::domain::{Actor, ReviewDecision, ReviewStatus, Task, TaskId, UserId};
use atelier::task::services::{ReviewTransitionRequest, TaskWorkflowError};
use rstest_bdd_macros::when;

fn scenario_task_id(world: &ReviewWorkflowWorld) -> Result<TaskId, eyre::Report> {
    world
        .task
        .as_ref()
        .map(Task::id)
        .ok_or_else(|| eyre::eyre!("missing created task in scenario world"))
}

fn record(world: &mut ReviewWorkflowWorld, result: Result<Task, TaskWorkflowError>) {
    if let Ok(ref updated) = result {
        world.task = Some(updated.clone());
    }
    world.last_result = Some(result);
}

fn apply(
    world: &mut ReviewWorkflowWorld,
    actor: Actor,
    request: ReviewTransitionRequest,
) -> Result<(), eyre::Report> {
    let task_id = scenario_task_id(world)?;
    let result = run_async(world.service.apply_decision(task_id, &actor, request));
    record(world, result);
    Ok(())
}

#[when(r#""{name}" submits the task for review"#)]
fn submit_for_review(world: &mut ReviewWorkflowWorld, name: String) -> Result<(), eyre::Report> {
    let task_id = scenario_task_id(world)?;
    let actor = Actor::member(world.user(&name));
    let result = run_async(world.service.submit_for_review(task_id, &actor));
    record(world, result);
    Ok(())
}

#[when(r#""{name}" approves the peer review"#)]
fn approve_peer_review(world: &mut ReviewWorkflowWorld, name: String) -> Result<(), eyre::Report> {
    let actor = Actor::member(world.user(&name));
    apply(
        world,
        actor,
        ReviewTransitionRequest::new(ReviewStatus::PendingReview, ReviewDecision::Approved),
    )
}

#[when(r#""{name}" requests changes with comment "{comment}""#)]
fn request_changes_with_comment(
    world: &mut ReviewWorkflowWorld,
    name: String,
    comment: String,
) -> Result<(), eyre::Report> {
    let actor = Actor::member(world.user(&name));
    apply(
        world,
        actor,
        ReviewTransitionRequest::new(ReviewStatus::PendingReview, ReviewDecision::ChangesRequested)
            .with_comment(comment),
    )
}

#[when(r#""{name}" requests changes without a comment"#)]
fn request_changes_without_comment(
    world: &mut ReviewWorkflowWorld,
    name: String,
) -> Result<(), eyre::Report> {
    let actor = Actor::member(world.user(&name));
    apply(
        world,
        actor,
        ReviewTransitionRequest::new(ReviewStatus::PendingReview, ReviewDecision::ChangesRequested),
    )
}

#[when(r#""{name}" approves the final review"#)]
fn approve_final_review(world: &mut ReviewWorkflowWorld, name: String) -> Result<(), eyre::Report> {
    let actor = Actor::member(world.user(&name));
    apply(
        world,
        actor,
        ReviewTransitionRequest::new(
            ReviewStatus::PendingFinalApproval,
            ReviewDecision::Approved,
        ),
    )
}

#[when(r#"an admin requests changes with comment "{comment}""#)]
fn admin_requests_changes(
    world: &mut ReviewWorkflowWorld,
    comment: String,
) -> Result<(), eyre::Report> {
    let actor = Actor::admin(UserId::new());
    apply(
        world,
        actor,
        ReviewTransitionRequest::new(ReviewStatus::Approved, ReviewDecision::ChangesRequested)
            .with_comment(comment),
    )
}
