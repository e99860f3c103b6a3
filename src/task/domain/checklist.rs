//! Task checklist items and the derived display status.

use super::{ChecklistItemId, ParseTaskStatusError, TaskDomainError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single to-do item on a task checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    id: ChecklistItemId,
    text: String,
    completed: bool,
}

impl ChecklistItem {
    /// Creates an incomplete checklist item with validated text.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyChecklistItem`] when the text is empty
    /// or whitespace-only.
    pub fn new(text: impl Into<String>) -> Result<Self, TaskDomainError> {
        Self::with_completed(text, false)
    }

    /// Creates a checklist item with an explicit completion flag.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyChecklistItem`] when the text is empty
    /// or whitespace-only.
    pub fn with_completed(text: impl Into<String>, completed: bool) -> Result<Self, TaskDomainError> {
        let raw = text.into();
        let normalized = raw.trim();
        if normalized.is_empty() {
            return Err(TaskDomainError::EmptyChecklistItem);
        }
        Ok(Self {
            id: ChecklistItemId::new(),
            text: normalized.to_owned(),
            completed,
        })
    }

    /// Returns the item identifier.
    #[must_use]
    pub const fn id(&self) -> ChecklistItemId {
        self.id
    }

    /// Returns the item text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns whether the item is marked complete.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.completed
    }

    pub(crate) const fn set_completed(&mut self, completed: bool) {
        self.completed = completed;
    }
}

/// Ordered checklist attached to a task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoChecklist(Vec<ChecklistItem>);

impl TodoChecklist {
    /// Creates an empty checklist.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Creates a checklist from existing items, preserving order.
    #[must_use]
    pub fn from_items(items: impl IntoIterator<Item = ChecklistItem>) -> Self {
        Self(items.into_iter().collect())
    }

    /// Returns the items in order.
    #[must_use]
    pub fn items(&self) -> &[ChecklistItem] {
        &self.0
    }

    /// Returns the total number of items.
    #[must_use]
    pub const fn total_count(&self) -> usize {
        self.0.len()
    }

    /// Returns the number of completed items.
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.0.iter().filter(|item| item.is_completed()).count()
    }

    /// Returns whether the checklist has no items.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sets the completion flag of the identified item.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::ChecklistItemNotFound`] when no item with
    /// the identifier exists.
    pub fn set_item_completed(
        &mut self,
        item_id: ChecklistItemId,
        completed: bool,
    ) -> Result<(), TaskDomainError> {
        let item = self
            .0
            .iter_mut()
            .find(|item| item.id() == item_id)
            .ok_or(TaskDomainError::ChecklistItemNotFound(item_id))?;
        item.set_completed(completed);
        Ok(())
    }
}

/// Derived display status of a task.
///
/// Computed purely from checklist completion; never authoritative for the
/// review workflow and never written from review transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// No item is complete (or the checklist is empty).
    Pending,
    /// Some but not all items are complete.
    InProgress,
    /// Every item is complete.
    Completed,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }

    /// Recomputes the display status from checklist completion.
    ///
    /// Pure and idempotent: the same checklist always yields the same status.
    /// The completion-ratio rule reduces to two equality checks, so no
    /// arithmetic is involved.
    #[must_use]
    pub fn from_checklist(checklist: &TodoChecklist) -> Self {
        let completed = checklist.completed_count();
        let total = checklist.total_count();
        if total == 0 || completed == 0 {
            Self::Pending
        } else if completed == total {
            Self::Completed
        } else {
            Self::InProgress
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}
