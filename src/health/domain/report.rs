//! Self-reported agent health.

use crate::AttributeMap;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Health an agent reports about itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentHealthReport {
    healthy: bool,
    details: AttributeMap,
    error: Option<String>,
}

impl AgentHealthReport {
    /// Creates a healthy report.
    #[must_use]
    pub fn healthy() -> Self {
        Self {
            healthy: true,
            details: AttributeMap::new(),
            error: None,
        }
    }

    /// Creates an unhealthy report.
    #[must_use]
    pub fn unhealthy() -> Self {
        Self {
            healthy: false,
            ..Self::healthy()
        }
    }

    /// Creates an unhealthy report for an agent whose health could not be read.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::unhealthy()
        }
    }

    /// Adds a detail value.
    #[must_use]
    pub fn with_detail(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.details.insert(key.into(), value);
        self
    }

    /// Returns whether the agent is healthy.
    #[must_use]
    pub const fn is_healthy(&self) -> bool {
        self.healthy
    }

    /// Returns the reported details.
    #[must_use]
    pub const fn details(&self) -> &AttributeMap {
        &self.details
    }

    /// Returns the error raised while reading health, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Aggregate of every registered agent's self-reported health.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthCheckReport {
    /// Whether every registered agent reported itself healthy.
    pub healthy: bool,
    /// Reports keyed by agent kind.
    pub agents: BTreeMap<String, AgentHealthReport>,
    /// When the check ran.
    pub checked_at: DateTime<Utc>,
}

impl HealthCheckReport {
    /// Aggregates agent reports; an empty set is healthy.
    #[must_use]
    pub fn from_reports(
        agents: BTreeMap<String, AgentHealthReport>,
        checked_at: DateTime<Utc>,
    ) -> Self {
        let healthy = agents.values().all(AgentHealthReport::is_healthy);
        Self {
            healthy,
            agents,
            checked_at,
        }
    }

    /// Returns the kinds of agents that reported themselves unhealthy.
    pub fn unhealthy_agents(&self) -> impl Iterator<Item = &str> {
        self.agents
            .iter()
            .filter(|(_, report)| !report.is_healthy())
            .map(|(kind, _)| kind.as_str())
    }
}
