//! Port for agents that report their own health.

use super::ProbeResult;
use crate::health::domain::AgentHealthReport;
use async_trait::async_trait;

/// An agent polled for self-reported health.
///
/// Reporters are registered by concrete type; one instance per type is kept.
#[async_trait]
pub trait AgentHealthReporter: Send + Sync {
    /// Returns the agent's current health report.
    async fn health_status(&self) -> ProbeResult<AgentHealthReport>;
}
