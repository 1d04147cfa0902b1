//! Collaborators used after a rollback has run.

use super::RollbackPortResult;
use crate::rollback::domain::{CleanupTarget, DeploymentId, IntegrityFinding, IntegrityScope};
use async_trait::async_trait;

/// Inspects one area of a deployment for data integrity.
#[async_trait]
pub trait IntegrityInspector: Send + Sync {
    /// Inspects `scope` and returns the findings.
    async fn inspect(
        &self,
        deployment_id: &DeploymentId,
        scope: IntegrityScope,
    ) -> RollbackPortResult<IntegrityFinding>;
}

/// Removes leftovers after a rollback.
#[async_trait]
pub trait WorkspaceCleaner: Send + Sync {
    /// Cleans `target` and returns the number of items removed.
    async fn clean(
        &self,
        deployment_id: &DeploymentId,
        target: CleanupTarget,
    ) -> RollbackPortResult<u64>;
}
