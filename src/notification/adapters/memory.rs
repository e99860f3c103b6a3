//! In-process connection manager delivering events over per-user channels.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::mpsc;

use crate::notification::{
    domain::RealtimeEvent,
    ports::{NotificationPublisher, NotificationPublishResult},
};
use crate::task::domain::UserId;

/// Events buffered per connection before the hub starts dropping.
const DEFAULT_EVENT_BUFFER: usize = 64;

/// Connection manager keyed by user id.
///
/// A user's channel is established by [`NotificationHub::connect`] (the
/// socket `setup` handshake) and torn down by
/// [`NotificationHub::disconnect`] when the session ends. Publishing to a
/// user with no channel, a closed channel, or a full buffer drops the event;
/// the publisher never blocks on a slow consumer.
#[derive(Debug, Clone)]
pub struct NotificationHub {
    channels: Arc<RwLock<HashMap<UserId, mpsc::Sender<RealtimeEvent>>>>,
    buffer: usize,
}

impl NotificationHub {
    /// Creates a hub with the default per-connection buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::with_buffer(DEFAULT_EVENT_BUFFER)
    }

    /// Creates a hub with an explicit per-connection buffer size.
    #[must_use]
    pub fn with_buffer(buffer: usize) -> Self {
        Self {
            channels: Arc::new(RwLock::new(HashMap::new())),
            buffer: buffer.max(1),
        }
    }

    /// Opens (or replaces) the user's channel and returns its receiving end.
    ///
    /// A reconnect replaces the previous sender, which closes the stale
    /// receiver held by the old session.
    #[must_use]
    pub fn connect(&self, user_id: UserId) -> NotificationReceiver {
        let (sender, receiver) = mpsc::channel(self.buffer);
        let mut channels = self
            .channels
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        channels.insert(user_id, sender);
        NotificationReceiver { inner: receiver }
    }

    /// Tears down the user's channel, if any.
    pub fn disconnect(&self, user_id: UserId) {
        let mut channels = self
            .channels
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        channels.remove(&user_id);
    }

    /// Returns whether the user currently has a live channel.
    #[must_use]
    pub fn is_connected(&self, user_id: UserId) -> bool {
        let channels = self
            .channels
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        channels
            .get(&user_id)
            .is_some_and(|sender| !sender.is_closed())
    }
}

impl Default for NotificationHub {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationPublisher for NotificationHub {
    async fn publish(&self, recipient: UserId, event: RealtimeEvent) -> NotificationPublishResult {
        let sender = {
            let channels = self
                .channels
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            channels.get(&recipient).cloned()
        };

        let Some(sender) = sender else {
            tracing::trace!(user_id = %recipient, "dropping event for disconnected user");
            return Ok(());
        };

        if let Err(err) = sender.try_send(event) {
            tracing::debug!(user_id = %recipient, error = %err, "dropping undeliverable event");
        }
        Ok(())
    }
}

/// Receiving end of a user's realtime channel.
#[derive(Debug)]
pub struct NotificationReceiver {
    inner: mpsc::Receiver<RealtimeEvent>,
}

impl NotificationReceiver {
    /// Waits for the next event; returns `None` once the channel is closed.
    pub async fn recv(&mut self) -> Option<RealtimeEvent> {
        self.inner.recv().await
    }

    /// Returns the next buffered event without waiting, if any.
    pub fn try_recv(&mut self) -> Option<RealtimeEvent> {
        self.inner.try_recv().ok()
    }
}
