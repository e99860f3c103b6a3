//! Application services for the task review workflow.

mod workflow;

pub use workflow::{
    ChecklistItemInput, CreateTaskRequest, ReviewTransitionRequest, ReviewWorkflowService,
    TaskWorkflowError, TaskWorkflowResult,
};
