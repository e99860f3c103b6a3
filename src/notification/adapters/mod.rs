//! Adapter implementations for realtime event publication.

pub mod memory;

pub use memory::{NotificationHub, NotificationReceiver};
