//! Collaborators that record and announce rollback results.

use super::RollbackPortResult;
use crate::rollback::domain::{AuditEntry, DeploymentId, RecoveryAttempt, RollbackOutcome};
use async_trait::async_trait;

/// Audit log for rollbacks.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Records a rollback.
    async fn log_rollback(
        &self,
        deployment_id: &DeploymentId,
        entry: &AuditEntry,
    ) -> RollbackPortResult<()>;
}

/// Sends rollback notifications.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RollbackNotifier: Send + Sync {
    /// Announces a completed rollback.
    async fn send_rollback_notification(
        &self,
        deployment_id: &DeploymentId,
        outcome: &RollbackOutcome,
    ) -> RollbackPortResult<()>;

    /// Announces a failed rollback and returns the channels notified.
    async fn send_rollback_failure_notification(
        &self,
        deployment_id: &DeploymentId,
        error: &str,
        attempts: &[RecoveryAttempt],
    ) -> RollbackPortResult<Vec<String>>;
}
