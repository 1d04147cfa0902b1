//! Post-rollback integrity verification and cleanup reports.

use super::DeploymentId;
use crate::AttributeMap;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Area inspected for data integrity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrityScope {
    /// Database contents.
    Database,
    /// Deployed files.
    Files,
    /// Configuration.
    Configuration,
}

impl IntegrityScope {
    /// Every scope in inspection order.
    pub const ALL: [Self; 3] = [Self::Database, Self::Files, Self::Configuration];

    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Database => "database",
            Self::Files => "files",
            Self::Configuration => "configuration",
        }
    }
}

impl fmt::Display for IntegrityScope {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Findings for one inspected scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegrityFinding {
    /// Whether the scope is intact.
    pub valid: bool,
    /// Inspector-specific details.
    #[serde(default)]
    pub details: AttributeMap,
}

impl IntegrityFinding {
    /// Creates an intact finding without details.
    #[must_use]
    pub fn valid() -> Self {
        Self {
            valid: true,
            details: AttributeMap::new(),
        }
    }

    /// Creates a broken finding without details.
    #[must_use]
    pub fn invalid() -> Self {
        Self {
            valid: false,
            details: AttributeMap::new(),
        }
    }
}

/// Result of `verify_data_integrity`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegrityReport {
    /// Deployment inspected.
    pub deployment_id: DeploymentId,
    /// Whether every scope was inspected and found intact.
    pub success: bool,
    /// Findings gathered before completion or the first failing scope.
    pub findings: BTreeMap<IntegrityScope, IntegrityFinding>,
    /// Failure message, if inspection stopped early.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// When inspection finished.
    pub timestamp: DateTime<Utc>,
}

/// Workspace area cleaned after a rollback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CleanupTarget {
    /// Temporary files.
    TemporaryFiles,
    /// Caches.
    Caches,
    /// Backups older than the retention window.
    StaleBackups,
}

impl CleanupTarget {
    /// Every target in cleanup order.
    pub const ALL: [Self; 3] = [Self::TemporaryFiles, Self::Caches, Self::StaleBackups];

    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TemporaryFiles => "temporary_files",
            Self::Caches => "caches",
            Self::StaleBackups => "stale_backups",
        }
    }
}

impl fmt::Display for CleanupTarget {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Result of `cleanup_after_rollback`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupReport {
    /// Deployment cleaned up after.
    pub deployment_id: DeploymentId,
    /// Whether every target was cleaned.
    pub success: bool,
    /// Items removed per target, gathered before completion or failure.
    pub removed: BTreeMap<CleanupTarget, u64>,
    /// Failure message, if cleanup stopped early.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// When cleanup finished.
    pub timestamp: DateTime<Utc>,
}
