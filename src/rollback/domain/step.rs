//! Rollback pipeline steps and their records.

use super::ParseRollbackStepError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A reversal phase that can be switched off in settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RollbackPhase {
    /// Database schema and data reversal.
    Database,
    /// Deployed file reversal.
    Files,
    /// Configuration reversal.
    Configuration,
    /// Dependency reversal.
    Dependencies,
}

impl RollbackPhase {
    /// Every phase in execution order.
    pub const ALL: [Self; 4] = [
        Self::Database,
        Self::Files,
        Self::Configuration,
        Self::Dependencies,
    ];

    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        RollbackStep::from_phase(self).as_str()
    }
}

impl fmt::Display for RollbackPhase {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// One step of the rollback pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RollbackStep {
    /// Pre-rollback backup.
    Backup,
    /// Database reversal.
    Database,
    /// File reversal.
    Files,
    /// Configuration reversal.
    Configuration,
    /// Dependency reversal.
    Dependencies,
    /// Post-rollback health verification.
    HealthCheck,
}

impl RollbackStep {
    /// Returns the step that runs a reversal phase.
    #[must_use]
    pub const fn from_phase(phase: RollbackPhase) -> Self {
        match phase {
            RollbackPhase::Database => Self::Database,
            RollbackPhase::Files => Self::Files,
            RollbackPhase::Configuration => Self::Configuration,
            RollbackPhase::Dependencies => Self::Dependencies,
        }
    }

    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Backup => "backup",
            Self::Database => "database",
            Self::Files => "files",
            Self::Configuration => "configuration",
            Self::Dependencies => "dependencies",
            Self::HealthCheck => "health_check",
        }
    }
}

impl From<RollbackPhase> for RollbackStep {
    fn from(phase: RollbackPhase) -> Self {
        Self::from_phase(phase)
    }
}

impl fmt::Display for RollbackStep {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl TryFrom<&str> for RollbackStep {
    type Error = ParseRollbackStepError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "backup" => Ok(Self::Backup),
            "database" => Ok(Self::Database),
            "files" => Ok(Self::Files),
            "configuration" => Ok(Self::Configuration),
            "dependencies" => Ok(Self::Dependencies),
            "health_check" => Ok(Self::HealthCheck),
            _ => Err(ParseRollbackStepError(value.to_owned())),
        }
    }
}

/// How a step ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    /// The step ran and succeeded.
    Success,
    /// The step's phase is disabled.
    Skipped,
}

/// Record of one completed pipeline step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    /// Step that ran.
    pub step: RollbackStep,
    /// How the step ended.
    pub status: StepStatus,
    /// Data returned by the collaborator, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl StepRecord {
    /// Records a successful step.
    #[must_use]
    pub fn succeeded(step: RollbackStep, data: Option<serde_json::Value>) -> Self {
        Self {
            step,
            status: StepStatus::Success,
            data,
        }
    }

    /// Records a skipped step.
    #[must_use]
    pub const fn skipped(step: RollbackStep) -> Self {
        Self {
            step,
            status: StepStatus::Skipped,
            data: None,
        }
    }
}
