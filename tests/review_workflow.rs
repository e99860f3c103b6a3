//! Behaviour tests for the review workflow state machine.

#[path = "review_workflow_steps/mod.rs"]
mod review_workflow_steps_defs;

use review_workflow_steps_defs::world::{ReviewWorkflowWorld, world};
use rstest_bdd_macros::scenario;

#[scenario(
    path = "tests/features/review_workflow.feature",
    name = "Submission with no reviewers skips peer review"
)]
#[tokio::test(flavor = "multi_thread")]
async fn submission_without_reviewers_skips_peer_review(world: ReviewWorkflowWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/review_workflow.feature",
    name = "Full review chain reaches approval"
)]
#[tokio::test(flavor = "multi_thread")]
async fn full_review_chain_reaches_approval(world: ReviewWorkflowWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/review_workflow.feature",
    name = "Requesting changes without a comment is rejected"
)]
#[tokio::test(flavor = "multi_thread")]
async fn changes_without_comment_rejected(world: ReviewWorkflowWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/review_workflow.feature",
    name = "Peer changes request sends the task back with a revision"
)]
#[tokio::test(flavor = "multi_thread")]
async fn peer_changes_request_records_revision(world: ReviewWorkflowWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/review_workflow.feature",
    name = "An admin reopens an approved task"
)]
#[tokio::test(flavor = "multi_thread")]
async fn admin_reopens_approved_task(world: ReviewWorkflowWorld) {
    let _ = world;
}
