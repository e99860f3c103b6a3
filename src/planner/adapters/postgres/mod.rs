//! `PostgreSQL` adapters for planner persistence.

mod models;
mod repository;
mod schema;

pub use repository::{PlannerPgPool, PostgresPlannerRepository};
