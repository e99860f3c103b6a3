//! Identifier and validated scalar types for the planner domain.

use super::PlannerDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a content idea.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdeaId(Uuid);

impl IdeaId {
    /// Creates a new random idea identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an idea identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for IdeaId {
    fn default() -> Self {
        Self::new()
    }
}

impl AsRef<Uuid> for IdeaId {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for IdeaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validated, non-empty content idea title.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdeaTitle(String);

impl IdeaTitle {
    /// Creates a validated idea title.
    ///
    /// Leading and trailing whitespace is trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerDomainError::EmptyTitle`] when the value is empty or
    /// whitespace-only.
    pub fn new(value: impl Into<String>) -> Result<Self, PlannerDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        if normalized.is_empty() {
            return Err(PlannerDomainError::EmptyTitle);
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Returns the title as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for IdeaTitle {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for IdeaTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
