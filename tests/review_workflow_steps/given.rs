//! Given steps for review workflow BDD scenarios.

use super::world::{ReviewWorkflowWorld, run_async};
use atelier::task::services::CreateTaskRequest;
use eyre::WrapErr;
use rstest_bdd_macros::given;

#[given(r#"a task assigned to "{assignee}" created by "{creator}""#)]
fn task_without_reviewers(
    world: &mut ReviewWorkflowWorld,
    assignee: String,
    creator: String,
) -> Result<(), eyre::Report> {
    let creator_id = world.user(&creator);
    let assignee_id = world.user(&assignee);
    let request = CreateTaskRequest::new("Publish the release announcement", creator_id)
        .with_assignees([assignee_id]);

    let created = run_async(world.service.create_task(request))
        .wrap_err("create task for review scenario")?;
    world.task = Some(created);
    Ok(())
}

#[given(r#"a reviewed task assigned to "{assignee}" created by "{creator}" with reviewer "{reviewer}""#)]
fn task_with_reviewer(
    world: &mut ReviewWorkflowWorld,
    assignee: String,
    creator: String,
    reviewer: String,
) -> Result<(), eyre::Report> {
    let creator_id = world.user(&creator);
    let assignee_id = world.user(&assignee);
    let reviewer_id = world.user(&reviewer);
    let request = CreateTaskRequest::new("Publish the release announcement", creator_id)
        .with_assignees([assignee_id])
        .with_reviewers([reviewer_id]);

    let created = run_async(world.service.create_task(request))
        .wrap_err("create task for review scenario")?;
    world.task = Some(created);
    Ok(())
}
