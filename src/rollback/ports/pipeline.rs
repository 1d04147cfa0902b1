//! Collaborators driven by the rollback pipeline.

use super::RollbackPortResult;
use crate::rollback::domain::{BackupDescriptor, DeploymentId, RollbackPhase};
use async_trait::async_trait;

/// Takes backups before a rollback starts.
#[async_trait]
pub trait BackupProvider: Send + Sync {
    /// Creates a backup under `label`.
    async fn create_backup(&self, label: &str) -> RollbackPortResult<BackupDescriptor>;
}

/// Reverts one phase of a deployment.
#[async_trait]
pub trait DeploymentReverter: Send + Sync {
    /// Reverts `phase` for the deployment and returns step data.
    async fn revert(
        &self,
        deployment_id: &DeploymentId,
        phase: RollbackPhase,
    ) -> RollbackPortResult<serde_json::Value>;
}

/// Verifies system health after a rollback or recovery action.
#[async_trait]
pub trait HealthVerifier: Send + Sync {
    /// Returns `true` when the system is healthy.
    async fn check_health(&self) -> RollbackPortResult<bool>;
}

/// Runs one recovery action after a failed rollback.
#[async_trait]
pub trait RecoveryStrategy: Send + Sync {
    /// Attempts recovery and returns a label for the action taken.
    async fn attempt_recovery(
        &self,
        deployment_id: &DeploymentId,
        attempt: u32,
    ) -> RollbackPortResult<String>;
}
