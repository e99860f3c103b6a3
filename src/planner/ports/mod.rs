//! Port contracts for planner persistence.

pub mod repository;

pub use repository::{PlannerRepository, PlannerRepositoryError, PlannerRepositoryResult};
