//! Task comment thread entries.

use super::{CommentId, TaskDomainError, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Validated, non-empty comment text.
///
/// Used both for chat comments and for the comment attached to a
/// changes-requested revision.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentText(String);

impl CommentText {
    /// Creates validated comment text.
    ///
    /// Leading and trailing whitespace is trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::CommentRequired`] when the value is empty
    /// or whitespace-only.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        if normalized.is_empty() {
            return Err(TaskDomainError::CommentRequired);
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Returns the comment text as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the value and returns the owned text.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for CommentText {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for CommentText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A comment posted to a task thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskComment {
    id: CommentId,
    author: UserId,
    text: CommentText,
    created_at: DateTime<Utc>,
}

impl TaskComment {
    /// Creates a comment stamped with the current clock time.
    #[must_use]
    pub fn new(author: UserId, text: CommentText, clock: &impl Clock) -> Self {
        Self {
            id: CommentId::new(),
            author,
            text,
            created_at: clock.utc(),
        }
    }

    /// Returns the comment identifier.
    #[must_use]
    pub const fn id(&self) -> CommentId {
        self.id
    }

    /// Returns the comment author.
    #[must_use]
    pub const fn author(&self) -> UserId {
        self.author
    }

    /// Returns the comment text.
    #[must_use]
    pub const fn text(&self) -> &CommentText {
        &self.text
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
