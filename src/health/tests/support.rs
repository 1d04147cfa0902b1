//! Probe targets and reporters shared by health tests.

use crate::AttributeMap;
use crate::health::{
    domain::AgentHealthReport,
    ports::{
        AgentHealthReporter, HealthCheckable, MetricsProvider, ProbeError, ProbeResult,
        ProbeTarget, RunningProbe,
    },
};
use async_trait::async_trait;

/// Probe target whose capabilities are switched on per field.
#[derive(Debug, Default)]
pub struct StubTarget {
    pub name: Option<String>,
    pub healthy: Option<bool>,
    pub running: Option<bool>,
    pub metrics: Option<AttributeMap>,
    pub failure: Option<String>,
}

impl StubTarget {
    pub fn healthy() -> Self {
        Self {
            healthy: Some(true),
            ..Self::default()
        }
    }

    pub fn unhealthy() -> Self {
        Self {
            healthy: Some(false),
            ..Self::default()
        }
    }

    pub fn running(running: bool) -> Self {
        Self {
            running: Some(running),
            ..Self::default()
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            healthy: Some(true),
            failure: Some(message.to_owned()),
            ..Self::default()
        }
    }

    fn check_failure(&self) -> ProbeResult<()> {
        match &self.failure {
            Some(message) => Err(ProbeError::unavailable(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl HealthCheckable for StubTarget {
    async fn is_healthy(&self) -> ProbeResult<bool> {
        self.check_failure()?;
        Ok(self.healthy.unwrap_or_default())
    }
}

#[async_trait]
impl RunningProbe for StubTarget {
    async fn is_running(&self) -> ProbeResult<bool> {
        self.check_failure()?;
        Ok(self.running.unwrap_or_default())
    }
}

#[async_trait]
impl MetricsProvider for StubTarget {
    async fn metrics(&self) -> ProbeResult<AttributeMap> {
        Ok(self.metrics.clone().unwrap_or_default())
    }
}

impl ProbeTarget for StubTarget {
    fn display_name(&self) -> Option<String> {
        self.name.clone()
    }

    fn as_health_checkable(&self) -> Option<&dyn HealthCheckable> {
        self.healthy.map(|_| self as &dyn HealthCheckable)
    }

    fn as_running_probe(&self) -> Option<&dyn RunningProbe> {
        self.running.map(|_| self as &dyn RunningProbe)
    }

    fn as_metrics_provider(&self) -> Option<&dyn MetricsProvider> {
        self.metrics.as_ref().map(|_| self as &dyn MetricsProvider)
    }
}

/// Self-reporting agent that is always healthy.
pub struct CacheAgent;

#[async_trait]
impl AgentHealthReporter for CacheAgent {
    async fn health_status(&self) -> ProbeResult<AgentHealthReport> {
        Ok(AgentHealthReport::healthy().with_detail("entries", serde_json::json!(12)))
    }
}

/// Self-reporting agent with a fixed verdict.
pub struct QueueAgent(pub bool);

#[async_trait]
impl AgentHealthReporter for QueueAgent {
    async fn health_status(&self) -> ProbeResult<AgentHealthReport> {
        if self.0 {
            Ok(AgentHealthReport::healthy())
        } else {
            Ok(AgentHealthReport::unhealthy())
        }
    }
}

/// Self-reporting agent whose health cannot be read.
pub struct BrokenAgent;

#[async_trait]
impl AgentHealthReporter for BrokenAgent {
    async fn health_status(&self) -> ProbeResult<AgentHealthReport> {
        Err(ProbeError::unavailable("socket closed"))
    }
}
