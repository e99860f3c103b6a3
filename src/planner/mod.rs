//! Social content planner for Atelier.
//!
//! Content ideas live either in one of twelve grid slots or in the
//! unassigned "warehouse" pool, and carry an independent scheduled date.
//! Placement follows displacement rules that never silently drop an idea.
//! The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
