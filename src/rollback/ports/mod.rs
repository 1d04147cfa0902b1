//! Port contracts for rollback collaborators.

mod error;
mod maintenance;
mod pipeline;
mod reporting;

pub use error::{RollbackPortError, RollbackPortResult};
pub use maintenance::{IntegrityInspector, WorkspaceCleaner};
pub use pipeline::{BackupProvider, DeploymentReverter, HealthVerifier, RecoveryStrategy};
pub use reporting::{AuditSink, RollbackNotifier};
#[cfg(test)]
pub use reporting::{MockAuditSink, MockRollbackNotifier};
