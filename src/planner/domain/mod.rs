//! Domain model for the content planner grid.

mod board;
mod error;
mod idea;
mod ids;
mod slot;

pub use board::{PlannerBoard, SlotChange};
pub use error::PlannerDomainError;
pub use idea::{ContentIdea, IdeaDraft, PersistedIdeaData};
pub use ids::{IdeaId, IdeaTitle};
pub use slot::{GRID_SLOT_COUNT, SlotIndex};
