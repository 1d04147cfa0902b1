//! Audit and backup records exchanged with collaborators.

use super::StepRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Final status written to the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditStatus {
    /// The rollback completed.
    Success,
    /// The rollback failed.
    Failed,
}

/// Entry written to the audit log for every rollback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Why the rollback ran, or why it failed.
    pub reason: String,
    /// Steps completed.
    pub steps: Vec<StepRecord>,
    /// Final status.
    pub status: AuditStatus,
}

/// Backup created before a rollback starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupDescriptor {
    /// Backup identifier assigned by the provider.
    pub id: String,
    /// Label the backup was requested under.
    pub label: String,
    /// When the backup was taken.
    pub created_at: DateTime<Utc>,
}
