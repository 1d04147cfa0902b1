//! Orchestration services for deployment rollback.

mod manager;

pub use manager::{RollbackError, RollbackManager, RollbackPorts};
