//! Fire-and-forget notification fan-out.

use minijinja::Value;
use std::sync::Arc;

use super::{NotificationTemplateError, NotificationTemplates};
use crate::notification::{domain::RealtimeEvent, ports::NotificationPublisher};
use crate::task::domain::UserId;

/// Renders workflow messages and fans events out to recipients.
///
/// Delivery is best-effort by contract: a failed render or publish is logged
/// and swallowed so that a state transition that already persisted can never
/// be failed by its notifications.
pub struct Notifier<P>
where
    P: NotificationPublisher,
{
    publisher: Arc<P>,
    templates: NotificationTemplates,
}

impl<P> Notifier<P>
where
    P: NotificationPublisher,
{
    /// Creates a notifier over the given publisher.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationTemplateError`] when the built-in templates
    /// fail to parse.
    pub fn new(publisher: Arc<P>) -> Result<Self, NotificationTemplateError> {
        Ok(Self {
            publisher,
            templates: NotificationTemplates::new()?,
        })
    }

    /// Publishes an event to every recipient, logging and swallowing
    /// failures.
    pub async fn broadcast(
        &self,
        recipients: impl IntoIterator<Item = UserId> + Send,
        event: RealtimeEvent,
    ) {
        for recipient in recipients {
            if let Err(err) = self.publisher.publish(recipient, event.clone()).await {
                tracing::warn!(user_id = %recipient, error = %err, "failed to publish event");
            }
        }
    }

    /// Renders the named template and broadcasts it as a `notification`
    /// event with the given link.
    pub async fn notify(
        &self,
        recipients: impl IntoIterator<Item = UserId> + Send,
        template: &str,
        context: Value,
        link: &str,
    ) {
        let message = match self.templates.render(template, context) {
            Ok(message) => message,
            Err(err) => {
                tracing::warn!(template, error = %err, "failed to render notification");
                return;
            }
        };
        self.broadcast(recipients, RealtimeEvent::notification(message, link))
            .await;
    }
}

impl<P> Clone for Notifier<P>
where
    P: NotificationPublisher,
{
    fn clone(&self) -> Self {
        Self {
            publisher: Arc::clone(&self.publisher),
            templates: self.templates.clone(),
        }
    }
}
