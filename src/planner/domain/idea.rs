//! Content idea aggregate.

use super::{IdeaId, IdeaTitle, SlotIndex};
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// A planned piece of content: either placed on the grid or in the
/// warehouse, and independently schedulable to a calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentIdea {
    id: IdeaId,
    title: IdeaTitle,
    notes: Option<String>,
    slot: Option<SlotIndex>,
    scheduled_date: Option<NaiveDate>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Validated input for creating a content idea.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdeaDraft {
    title: IdeaTitle,
    notes: Option<String>,
}

impl IdeaDraft {
    /// Creates a draft with the required title.
    #[must_use]
    pub const fn new(title: IdeaTitle) -> Self {
        Self { title, notes: None }
    }

    /// Sets free-text notes.
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Parameter object for reconstructing a persisted content idea.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedIdeaData {
    /// Persisted idea identifier.
    pub id: IdeaId,
    /// Persisted title.
    pub title: IdeaTitle,
    /// Persisted notes, if any.
    pub notes: Option<String>,
    /// Persisted grid slot, if placed.
    pub slot: Option<SlotIndex>,
    /// Persisted scheduled date, if any.
    pub scheduled_date: Option<NaiveDate>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl ContentIdea {
    /// Creates a new idea in the warehouse with no scheduled date.
    #[must_use]
    pub fn new(draft: IdeaDraft, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: IdeaId::new(),
            title: draft.title,
            notes: draft.notes,
            slot: None,
            scheduled_date: None,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs an idea from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedIdeaData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            notes: data.notes,
            slot: data.slot,
            scheduled_date: data.scheduled_date,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the idea identifier.
    #[must_use]
    pub const fn id(&self) -> IdeaId {
        self.id
    }

    /// Returns the idea title.
    #[must_use]
    pub const fn title(&self) -> &IdeaTitle {
        &self.title
    }

    /// Returns the notes, if any.
    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Returns the grid slot, or `None` when the idea is in the warehouse.
    #[must_use]
    pub const fn slot(&self) -> Option<SlotIndex> {
        self.slot
    }

    /// Returns whether the idea is in the warehouse.
    #[must_use]
    pub const fn is_in_warehouse(&self) -> bool {
        self.slot.is_none()
    }

    /// Returns the scheduled date, if any.
    #[must_use]
    pub const fn scheduled_date(&self) -> Option<NaiveDate> {
        self.scheduled_date
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Sets or clears the scheduled date.
    ///
    /// Scheduling is independent of grid placement and never changes slot
    /// occupancy.
    pub fn schedule(&mut self, date: Option<NaiveDate>, clock: &impl Clock) {
        self.scheduled_date = date;
        self.updated_at = clock.utc();
    }

    pub(crate) const fn set_slot(&mut self, slot: Option<SlotIndex>) {
        self.slot = slot;
    }
}
