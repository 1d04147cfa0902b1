//! Supervisor configuration.
//!
//! Settings deserialize from JSON with every field optional; omitted fields
//! take their defaults. [`SupervisorSettings::from_json_str`] validates the
//! result before returning it.

use crate::health::domain::{MetricThresholds, TrackedMetric};
use crate::rollback::domain::RollbackPhase;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Errors raised while loading settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The document is not valid settings JSON.
    #[error("malformed settings document: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Recovery must allow at least one attempt.
    #[error("recovery max_attempts must be at least 1")]
    ZeroRecoveryAttempts,

    /// A threshold is negative or not finite.
    #[error("threshold for {metric} must be a finite, non-negative number, got {value}")]
    InvalidThreshold {
        /// Metric whose threshold is invalid.
        metric: TrackedMetric,
        /// Rejected value.
        value: f64,
    },
}

/// Top-level supervisor settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SupervisorSettings {
    /// Rollback pipeline settings.
    pub rollback: RollbackSettings,
    /// Health monitor settings.
    pub health: HealthSettings,
}

impl SupervisorSettings {
    /// Parses and validates settings from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Malformed`] when the document does not parse,
    /// or a validation error when a value is out of range.
    pub fn from_json_str(document: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(document)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns the first out-of-range value found.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.rollback.recovery.max_attempts == 0 {
            return Err(SettingsError::ZeroRecoveryAttempts);
        }
        for metric in TrackedMetric::ALL {
            let value = self.health.thresholds.value(metric);
            if !MetricThresholds::is_valid_ceiling(value) {
                return Err(SettingsError::InvalidThreshold { metric, value });
            }
        }
        Ok(())
    }
}

/// Health monitor settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthSettings {
    /// Metric ceilings applied by the monitor.
    pub thresholds: MetricThresholds,
}

/// Rollback pipeline settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RollbackSettings {
    /// Database reversal phase.
    pub database: PhaseSettings,
    /// File reversal phase.
    pub files: PhaseSettings,
    /// Configuration reversal phase.
    pub configuration: PhaseSettings,
    /// Dependency reversal phase.
    pub dependencies: PhaseSettings,
    /// Recovery loop run after a failed rollback.
    pub recovery: RecoverySettings,
}

impl RollbackSettings {
    /// Returns whether a reversal phase is enabled.
    #[must_use]
    pub const fn is_enabled(&self, phase: RollbackPhase) -> bool {
        match phase {
            RollbackPhase::Database => self.database.enabled,
            RollbackPhase::Files => self.files.enabled,
            RollbackPhase::Configuration => self.configuration.enabled,
            RollbackPhase::Dependencies => self.dependencies.enabled,
        }
    }
}

/// Toggle for one reversal phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhaseSettings {
    /// Whether the phase runs.
    pub enabled: bool,
}

impl Default for PhaseSettings {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Recovery loop settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecoverySettings {
    /// Whether recovery is attempted after a failed rollback.
    pub enabled: bool,
    /// Upper bound on recovery attempts.
    pub max_attempts: u32,
    /// Delay between attempts, in seconds.
    pub retry_interval_secs: u64,
}

impl RecoverySettings {
    /// Returns the delay between attempts.
    #[must_use]
    pub const fn retry_interval(&self) -> Duration {
        Duration::from_secs(self.retry_interval_secs)
    }
}

impl Default for RecoverySettings {
    fn default() -> Self {
        Self {
            enabled: true,
            max_attempts: 3,
            retry_interval_secs: 5,
        }
    }
}
