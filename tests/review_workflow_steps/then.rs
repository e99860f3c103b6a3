//! Then steps for review workflow BDD scenarios.

use super::world::{ReviewWorkflowWorld, run_async};
use atelier::task::{
    domain::{ReviewStatus, TaskDomainError},
    services::TaskWorkflowError,
};
use rstest_bdd_macros::then;

#[then(r#"the review status is "{status}""#)]
fn review_status_is(world: &ReviewWorkflowWorld, status: String) -> Result<(), eyre::Report> {
    let expected = ReviewStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;

    let task = world
        .task
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing created task"))?;
    let stored = run_async(world.service.get_task(task.id()))
        .map_err(|err| eyre::eyre!("lookup failed: {err}"))?
        .ok_or_else(|| eyre::eyre!("task disappeared from the store"))?;

    if stored.review_status() != expected {
        return Err(eyre::eyre!(
            "expected review status {}, found {}",
            expected.as_str(),
            stored.review_status().as_str()
        ));
    }
    Ok(())
}

#[then("the transition fails because a comment is required")]
fn transition_fails_comment_required(world: &ReviewWorkflowWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing transition result"))?;

    if !matches!(
        result,
        Err(TaskWorkflowError::Domain(TaskDomainError::CommentRequired))
    ) {
        return Err(eyre::eyre!("expected CommentRequired error, got {result:?}"));
    }
    Ok(())
}

#[then("the revision count is {count:u64}")]
fn revision_count_is(world: &ReviewWorkflowWorld, count: u64) -> Result<(), eyre::Report> {
    let task = world
        .task
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing created task"))?;
    let stored = run_async(world.service.get_task(task.id()))
        .map_err(|err| eyre::eyre!("lookup failed: {err}"))?
        .ok_or_else(|| eyre::eyre!("task disappeared from the store"))?;

    let actual = u64::try_from(stored.revision_count()).unwrap_or_default();
    if actual != count {
        return Err(eyre::eyre!("expected {count} revisions, found {actual}"));
    }
    Ok(())
}

#[then(r#"the latest revision comment is "{comment}""#)]
fn latest_revision_comment_is(
    world: &ReviewWorkflowWorld,
    comment: String,
) -> Result<(), eyre::Report> {
    let task = world
        .task
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing created task"))?;
    let stored = run_async(world.service.get_task(task.id()))
        .map_err(|err| eyre::eyre!("lookup failed: {err}"))?
        .ok_or_else(|| eyre::eyre!("task disappeared from the store"))?;

    let latest = stored
        .revision_history()
        .last()
        .ok_or_else(|| eyre::eyre!("revision history is empty"))?;
    if latest.comment().as_str() != comment {
        return Err(eyre::eyre!(
            "expected revision comment '{comment}', found '{}'",
            latest.comment().as_str()
        ));
    }
    Ok(())
}
