//! Validated grid slot addressing.

use super::PlannerDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of slots on the planner grid.
pub const GRID_SLOT_COUNT: u8 = 12;

/// Grid slot index in `[0, GRID_SLOT_COUNT)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct SlotIndex(u8);

impl SlotIndex {
    /// The first grid slot; the documented fallback target when a warehouse
    /// item is auto-placed onto a full grid.
    pub const ZERO: Self = Self(0);

    /// Creates a validated slot index.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerDomainError::InvalidSlotIndex`] when the value is
    /// not below [`GRID_SLOT_COUNT`].
    pub const fn new(value: u8) -> Result<Self, PlannerDomainError> {
        if value >= GRID_SLOT_COUNT {
            return Err(PlannerDomainError::InvalidSlotIndex(value));
        }
        Ok(Self(value))
    }

    /// Returns the numeric index.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Iterates every slot index in order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..GRID_SLOT_COUNT).map(Self)
    }
}

impl TryFrom<u8> for SlotIndex {
    type Error = PlannerDomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SlotIndex> for u8 {
    fn from(slot: SlotIndex) -> Self {
        slot.value()
    }
}

impl fmt::Display for SlotIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
