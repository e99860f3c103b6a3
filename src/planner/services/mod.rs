//! Application services for planner orchestration.

mod placement;

pub use placement::{
    BoardSnapshot, CreateIdeaRequest, PlannerError, PlannerResult, PlannerService,
};
