//! Per-user real-time event delivery for Atelier.
//!
//! The realtime layer is an explicit connection-manager service keyed by
//! user id with a connect/disconnect lifecycle tied to authentication state,
//! injected into whichever service needs to emit events. Delivery is
//! fire-and-forget: events published to a user with no live connection (or a
//! full buffer) are dropped, and clients discover missed changes on their
//! next fetch.
//!
//! - Event contract in [`domain`]
//! - Publisher port in [`ports`]
//! - In-process hub adapter in [`adapters`]
//! - Message rendering and fan-out in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
