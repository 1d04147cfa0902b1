//! Domain model for deployment rollback.
//!
//! Pipeline steps, their records, recovery attempts, audit entries and the
//! maintenance reports produced after a rollback.

mod audit;
mod error;
mod ids;
mod maintenance;
mod outcome;
mod step;

pub use audit::{AuditEntry, AuditStatus, BackupDescriptor};
pub use error::{ParseRollbackStepError, RollbackDomainError};
pub use ids::DeploymentId;
pub use maintenance::{
    CleanupReport, CleanupTarget, IntegrityFinding, IntegrityReport, IntegrityScope,
};
pub use outcome::{FailureHandling, RecoveryAttempt, RecoveryStatus, RollbackOutcome};
pub use step::{RollbackPhase, RollbackStep, StepRecord, StepStatus};
