//! Deployment rollback with bounded recovery.
//!
//! The [`services::RollbackManager`] runs a fixed-order rollback pipeline
//! against external collaborators, retries recovery a bounded number of
//! times when the pipeline fails, and reports through audit and
//! notification ports. The module follows hexagonal architecture:
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
