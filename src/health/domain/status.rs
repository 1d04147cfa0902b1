//! Health status of a probed service or agent.

use super::ParseHealthStatusError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Health status recorded by the latest probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    /// The target exposes no health or running predicate.
    Unknown,
    /// The target reported itself healthy or running.
    Healthy,
    /// The target reported itself unhealthy.
    Unhealthy,
    /// The target reported that it is not running.
    Stopped,
    /// Probing the target failed.
    Error,
}

impl HealthStatus {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Healthy => "healthy",
            Self::Unhealthy => "unhealthy",
            Self::Stopped => "stopped",
            Self::Error => "error",
        }
    }

    /// Returns whether the status counts towards the healthy ratio.
    #[must_use]
    pub const fn is_healthy(self) -> bool {
        matches!(self, Self::Healthy)
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl TryFrom<&str> for HealthStatus {
    type Error = ParseHealthStatusError;

    fn try_from(value: &str) -> Result<Self, ParseHealthStatusError> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "unknown" => Ok(Self::Unknown),
            "healthy" => Ok(Self::Healthy),
            "unhealthy" => Ok(Self::Unhealthy),
            "stopped" => Ok(Self::Stopped),
            "error" => Ok(HealthStatus::Error),
            _ => Err(ParseHealthStatusError(value.to_owned())),
        }
    }
}
