//! Error types for planner domain validation and placement.

use super::{IdeaId, SlotIndex};
use thiserror::Error;

/// Errors returned while constructing or mutating planner domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PlannerDomainError {
    /// The slot index is outside the grid.
    #[error("slot index {0} is out of range")]
    InvalidSlotIndex(u8),

    /// The idea title is empty after trimming.
    #[error("content idea title must not be empty")]
    EmptyTitle,

    /// The idea is not part of the board.
    #[error("unknown content idea: {0}")]
    UnknownIdea(IdeaId),

    /// The source slot of a grid move holds no idea.
    #[error("slot {0} is empty")]
    SlotEmpty(SlotIndex),

    /// A warehouse placement targeted an idea that is already on the grid.
    #[error("idea {idea_id} is already placed in slot {slot}")]
    IdeaAlreadyPlaced {
        /// The idea that was expected to be in the warehouse.
        idea_id: IdeaId,
        /// The slot it actually occupies.
        slot: SlotIndex,
    },

    /// A warehouse release targeted an idea that is not on the grid.
    #[error("idea {0} is not on the board")]
    IdeaNotOnBoard(IdeaId),

    /// Two ideas claim the same slot in persisted state.
    #[error("slot {0} is occupied by more than one idea")]
    DuplicateOccupancy(SlotIndex),
}
