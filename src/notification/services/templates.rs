//! Named message templates for workflow notifications.

use minijinja::{Environment, Value};
use thiserror::Error;

/// Template for a user being added as an assignee.
pub const TEMPLATE_TASK_ASSIGNED: &str = "task_assigned";
/// Template for a task arriving in peer review.
pub const TEMPLATE_REVIEW_SUBMITTED: &str = "review_submitted";
/// Template for a task passing peer review.
pub const TEMPLATE_PEER_APPROVED: &str = "peer_approved";
/// Template for changes being requested at any stage.
pub const TEMPLATE_CHANGES_REQUESTED: &str = "changes_requested";
/// Template for the creator's final approval.
pub const TEMPLATE_FINAL_APPROVED: &str = "final_approved";
/// Template for an approved task being reopened.
pub const TEMPLATE_TASK_REOPENED: &str = "task_reopened";
/// Template for the rate-limited reviewer reminder.
pub const TEMPLATE_REVIEWER_NUDGED: &str = "reviewer_nudged";

const TEMPLATE_SOURCES: &[(&str, &str)] = &[
    (TEMPLATE_TASK_ASSIGNED, "You were assigned '{{ title }}'"),
    (
        TEMPLATE_REVIEW_SUBMITTED,
        "'{{ title }}' was submitted and is waiting on your review",
    ),
    (
        TEMPLATE_PEER_APPROVED,
        "'{{ title }}' passed peer review and is waiting on your final approval",
    ),
    (
        TEMPLATE_CHANGES_REQUESTED,
        "Changes were requested on '{{ title }}': {{ comment }}",
    ),
    (TEMPLATE_FINAL_APPROVED, "'{{ title }}' was approved"),
    (
        TEMPLATE_TASK_REOPENED,
        "'{{ title }}' was reopened: {{ comment }}",
    ),
    (
        TEMPLATE_REVIEWER_NUDGED,
        "Reminder: '{{ title }}' is still waiting on your decision",
    ),
];

/// Error returned when a notification template fails to load or render.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct NotificationTemplateError(#[from] minijinja::Error);

/// Registry of named notification message templates.
#[derive(Debug, Clone)]
pub struct NotificationTemplates {
    env: Environment<'static>,
}

impl NotificationTemplates {
    /// Builds the registry with every workflow template registered.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationTemplateError`] when a template source fails to
    /// parse.
    pub fn new() -> Result<Self, NotificationTemplateError> {
        let mut env = Environment::new();
        for (name, source) in TEMPLATE_SOURCES {
            env.add_template(name, source)?;
        }
        Ok(Self { env })
    }

    /// Renders the named template with the given context.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationTemplateError`] when the template is unknown or
    /// rendering fails.
    pub fn render(&self, name: &str, context: Value) -> Result<String, NotificationTemplateError> {
        let template = self.env.get_template(name)?;
        Ok(template.render(context)?)
    }
}
