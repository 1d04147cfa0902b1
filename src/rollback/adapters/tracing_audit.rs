//! Audit sink that writes rollback entries to `tracing`.

use crate::rollback::{
    domain::{AuditEntry, AuditStatus, DeploymentId},
    ports::{AuditSink, RollbackPortResult},
};
use async_trait::async_trait;
use tracing::{info, warn};

/// Target used for audit events.
pub const AUDIT_TARGET: &str = "warden::audit";

/// Audit sink emitting one `tracing` event per rollback.
///
/// Completed rollbacks are logged at `info`, failed ones at `warn`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

impl TracingAuditSink {
    /// Creates the sink.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AuditSink for TracingAuditSink {
    async fn log_rollback(
        &self,
        deployment_id: &DeploymentId,
        entry: &AuditEntry,
    ) -> RollbackPortResult<()> {
        let steps: Vec<&str> = entry.steps.iter().map(|record| record.step.as_str()).collect();
        match entry.status {
            AuditStatus::Success => info!(
                target: AUDIT_TARGET,
                deployment_id = %deployment_id,
                reason = %entry.reason,
                ?steps,
                "rollback completed"
            ),
            AuditStatus::Failed => warn!(
                target: AUDIT_TARGET,
                deployment_id = %deployment_id,
                reason = %entry.reason,
                ?steps,
                "rollback failed"
            ),
        }
        Ok(())
    }
}
