//! Publisher port for realtime event delivery.

use crate::notification::domain::RealtimeEvent;
use crate::task::domain::UserId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for publisher operations.
pub type NotificationPublishResult = Result<(), NotificationPublishError>;

/// Realtime event publication contract.
///
/// Implementations deliver best-effort: publishing to a recipient with no
/// live connection succeeds and drops the event. An error indicates an
/// internal transport failure, not an offline recipient.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationPublisher: Send + Sync {
    /// Publishes an event to the recipient's channel, if connected.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationPublishError`] on internal transport failure.
    async fn publish(&self, recipient: UserId, event: RealtimeEvent) -> NotificationPublishResult;
}

/// Errors returned by publisher implementations.
#[derive(Debug, Clone, Error)]
pub enum NotificationPublishError {
    /// Transport-layer failure.
    #[error("publish failure: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl NotificationPublishError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
