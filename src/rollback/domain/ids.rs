//! Identifier type for deployments under rollback.

use super::RollbackDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of the deployment being rolled back.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeploymentId(String);

impl DeploymentId {
    /// Creates a validated deployment identifier.
    ///
    /// # Errors
    ///
    /// Returns [`RollbackDomainError::EmptyDeploymentId`] when the value is
    /// empty after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, RollbackDomainError> {
        let normalized = value.into().trim().to_owned();
        if normalized.is_empty() {
            return Err(RollbackDomainError::EmptyDeploymentId);
        }
        Ok(Self(normalized))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the label used for the pre-rollback backup.
    #[must_use]
    pub fn backup_label(&self) -> String {
        format!("pre_rollback_{}", self.0)
    }
}

impl AsRef<str> for DeploymentId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for DeploymentId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl TryFrom<&str> for DeploymentId {
    type Error = RollbackDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
