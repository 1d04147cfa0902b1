//! Identifier type for supervised agents.

use super::AgentDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a supervised agent.
///
/// Agent identifiers are caller-chosen keys such as `svc-a` or
/// `billing.worker`. The input is trimmed; case is preserved.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(String);

impl AgentId {
    /// Creates a validated agent identifier.
    ///
    /// # Errors
    ///
    /// Returns [`AgentDomainError::EmptyAgentId`] when the value is empty
    /// after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, AgentDomainError> {
        let normalized = value.into().trim().to_owned();
        if normalized.is_empty() {
            return Err(AgentDomainError::EmptyAgentId);
        }
        Ok(Self(normalized))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for AgentId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl TryFrom<&str> for AgentId {
    type Error = AgentDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
