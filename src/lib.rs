//! Atelier: task and project management core.
//!
//! This crate provides the server-side core for a collaborative task
//! management application: task records with checklists, a review/approval
//! workflow, per-user real-time notification delivery, and a social content
//! planner.
//!
//! # Architecture
//!
//! Atelier follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, channels, etc.)
//!
//! # Modules
//!
//! - [`task`]: Task records, checklist status derivation, and the review
//!   workflow state machine
//! - [`notification`]: Per-user real-time event delivery and message rendering
//! - [`planner`]: Social content planner grid and scheduling

pub mod notification;
pub mod planner;
pub mod task;
