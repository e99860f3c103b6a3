//! Review workflow states, decisions, and the transition edge set.

use super::ParseReviewStatusError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Authoritative review workflow state of a task.
///
/// The display status derived from the checklist is cosmetic; this state
/// alone governs which workflow actions are valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    /// Work has not been submitted for review.
    NotSubmitted,
    /// Submitted and awaiting a peer reviewer's decision.
    PendingReview,
    /// Peer review passed (or was skipped); awaiting the creator's sign-off.
    PendingFinalApproval,
    /// Signed off by the creator. Soft-terminal: reopenable.
    Approved,
    /// A reviewer or the creator requested changes; back with the assignees.
    ChangesRequested,
}

impl ReviewStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotSubmitted => "not_submitted",
            Self::PendingReview => "pending_review",
            Self::PendingFinalApproval => "pending_final_approval",
            Self::Approved => "approved",
            Self::ChangesRequested => "changes_requested",
        }
    }

    /// Returns whether assignees may submit the task for review from this
    /// state.
    #[must_use]
    pub const fn is_submittable(self) -> bool {
        matches!(self, Self::NotSubmitted | Self::ChangesRequested)
    }

    /// Returns whether transition to `target` is allowed.
    ///
    /// Encodes the complete edge set of the review state machine; no other
    /// transition is ever applied.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (
                Self::NotSubmitted | Self::ChangesRequested,
                Self::PendingReview | Self::PendingFinalApproval
            ) | (
                Self::PendingReview,
                Self::PendingFinalApproval | Self::ChangesRequested
            ) | (
                Self::PendingFinalApproval,
                Self::Approved | Self::ChangesRequested
            ) | (Self::Approved, Self::ChangesRequested)
        )
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ReviewStatus {
    type Error = ParseReviewStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "not_submitted" => Ok(Self::NotSubmitted),
            "pending_review" => Ok(Self::PendingReview),
            "pending_final_approval" => Ok(Self::PendingFinalApproval),
            "approved" => Ok(Self::Approved),
            "changes_requested" => Ok(Self::ChangesRequested),
            _ => Err(ParseReviewStatusError(value.to_owned())),
        }
    }
}

/// Decision carried by a review or final-approval request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewDecision {
    /// Accept the work and advance the workflow.
    Approved,
    /// Send the work back to the assignees with a required comment.
    ChangesRequested,
}

impl ReviewDecision {
    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::ChangesRequested => "changes_requested",
        }
    }
}

impl fmt::Display for ReviewDecision {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Workflow action attempted by a caller, used in guard errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowAction {
    /// Submit the task for review.
    Submit,
    /// Record a peer reviewer's decision.
    PeerReview,
    /// Record the creator's final decision.
    FinalApproval,
    /// Reopen an approved task for further changes.
    Reopen,
    /// Nudge whoever currently owes a review decision.
    Nudge,
    /// Post a comment to the task thread.
    Comment,
    /// Mutate the task checklist.
    EditChecklist,
    /// Remove the task record.
    Delete,
}

impl WorkflowAction {
    /// Returns the canonical representation used in error messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Submit => "submit",
            Self::PeerReview => "peer_review",
            Self::FinalApproval => "final_approval",
            Self::Reopen => "reopen",
            Self::Nudge => "nudge",
            Self::Comment => "comment",
            Self::EditChecklist => "edit_checklist",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for WorkflowAction {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}
