//! Results of rollback execution and failure handling.

use super::{DeploymentId, StepRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How a recovery attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryStatus {
    /// The action ran and health verification passed.
    Recovered,
    /// The action ran but health verification did not pass.
    Unverified,
    /// The recovery action itself failed.
    Failed,
}

/// One iteration of the recovery loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveryAttempt {
    /// One-based attempt number.
    pub attempt: u32,
    /// When the attempt finished.
    pub timestamp: DateTime<Utc>,
    /// Label of the recovery action.
    pub action: String,
    /// How the attempt ended.
    pub status: RecoveryStatus,
    /// Failure or verification detail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Result of handling a failed rollback.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureHandling {
    /// Whether handling completed without error.
    pub handled: bool,
    /// Whether a recovery attempt was verified healthy.
    pub recovered: bool,
    /// Every recovery attempt made.
    pub recovery_actions: Vec<RecoveryAttempt>,
    /// Channels the failure notification reached.
    pub notifications_sent: Vec<String>,
    /// Error raised while handling the failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of one `execute_rollback` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollbackOutcome {
    /// Deployment rolled back.
    pub deployment_id: DeploymentId,
    /// Steps completed before success or the first failure.
    pub steps: Vec<StepRecord>,
    /// Whether every step succeeded.
    pub success: bool,
    /// Failure message when the pipeline failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// When the pipeline finished.
    pub timestamp: DateTime<Utc>,
    /// Wall time spent, in milliseconds.
    pub duration_ms: u64,
    /// Failure handling result when the pipeline failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_handling: Option<FailureHandling>,
}
