//! Agent registration and lifecycle supervision.
//!
//! This module tracks managed agents: registering them, starting, stopping
//! and restarting them through optional lifecycle hooks, storing their
//! configuration and metrics, and accumulating hook failures into a
//! manager-wide health flag. It also provides the category-scoped
//! [`domain::AgentRegistry`] lookup. The module follows hexagonal
//! architecture:
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
