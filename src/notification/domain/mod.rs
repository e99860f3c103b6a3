//! Event contract for the realtime layer.

mod event;

pub use event::RealtimeEvent;
