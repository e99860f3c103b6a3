//! Append-only revision history entries.
//!
//! One entry is recorded for every transition into `ChangesRequested`; the
//! history is never rewritten or truncated.

use super::{CommentText, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// A recorded "changes requested" cycle with its mandatory comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionEntry {
    comment: CommentText,
    made_by: UserId,
    created_at: DateTime<Utc>,
}

impl RevisionEntry {
    /// Creates a revision entry stamped with the current clock time.
    #[must_use]
    pub fn new(comment: CommentText, made_by: UserId, clock: &impl Clock) -> Self {
        Self {
            comment,
            made_by,
            created_at: clock.utc(),
        }
    }

    /// Returns the revision comment.
    #[must_use]
    pub const fn comment(&self) -> &CommentText {
        &self.comment
    }

    /// Returns the user who requested the changes.
    #[must_use]
    pub const fn made_by(&self) -> UserId {
        self.made_by
    }

    /// Returns the entry timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
