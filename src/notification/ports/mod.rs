//! Port contracts for realtime event publication.

pub mod publisher;

pub use publisher::{NotificationPublishError, NotificationPublisher, NotificationPublishResult};
