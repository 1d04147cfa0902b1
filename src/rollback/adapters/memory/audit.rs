//! Audit sink that keeps entries in memory.

use super::lock_error;
use crate::rollback::{
    domain::{AuditEntry, DeploymentId},
    ports::{AuditSink, RollbackPortResult},
};
use async_trait::async_trait;
use std::sync::{Arc, RwLock};

/// Audit sink recording every entry it receives.
#[derive(Debug, Clone, Default)]
pub struct RecordingAuditSink {
    entries: Arc<RwLock<Vec<(DeploymentId, AuditEntry)>>>,
}

impl RecordingAuditSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns recorded entries in arrival order.
    ///
    /// # Errors
    ///
    /// Returns an error when the sink lock is poisoned.
    pub fn entries(&self) -> RollbackPortResult<Vec<(DeploymentId, AuditEntry)>> {
        let entries = self.entries.read().map_err(lock_error)?;
        Ok(entries.clone())
    }
}

#[async_trait]
impl AuditSink for RecordingAuditSink {
    async fn log_rollback(
        &self,
        deployment_id: &DeploymentId,
        entry: &AuditEntry,
    ) -> RollbackPortResult<()> {
        let mut entries = self.entries.write().map_err(lock_error)?;
        entries.push((deployment_id.clone(), entry.clone()));
        Ok(())
    }
}
