//! Agent lifecycle state.

use super::ParseAgentLifecycleStateError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a supervised agent.
///
/// Hook failures are tracked in the agent's error log rather than as a
/// separate state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentLifecycleState {
    /// Agent is registered but has never been started or stopped.
    Registered,
    /// Agent is currently running.
    Running,
    /// Agent was stopped.
    Stopped,
}

impl AgentLifecycleState {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Registered => "registered",
            Self::Running => "running",
            Self::Stopped => "stopped",
        }
    }

    /// Returns whether the agent is running.
    #[must_use]
    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }
}

impl fmt::Display for AgentLifecycleState {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl TryFrom<&str> for AgentLifecycleState {
    type Error = ParseAgentLifecycleStateError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "registered" => Ok(Self::Registered),
            "running" => Ok(Self::Running),
            "stopped" => Ok(Self::Stopped),
            _ => Err(ParseAgentLifecycleStateError(value.to_owned())),
        }
    }
}
