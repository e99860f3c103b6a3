//! Message rendering and fan-out services for the realtime layer.

mod notifier;
mod templates;

pub use notifier::Notifier;
pub use templates::{
    NotificationTemplateError, NotificationTemplates, TEMPLATE_CHANGES_REQUESTED,
    TEMPLATE_FINAL_APPROVED, TEMPLATE_PEER_APPROVED, TEMPLATE_REVIEWER_NUDGED,
    TEMPLATE_REVIEW_SUBMITTED, TEMPLATE_TASK_ASSIGNED, TEMPLATE_TASK_REOPENED,
};
