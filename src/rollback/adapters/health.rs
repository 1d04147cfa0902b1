//! Health verification backed by the health monitor.

use crate::health::services::HealthMonitor;
use crate::rollback::ports::{HealthVerifier, RollbackPortResult};
use async_trait::async_trait;
use mockable::Clock;

/// Healthy when every self-reporting agent is healthy and the probed system
/// snapshot is healthy.
#[async_trait]
impl<C> HealthVerifier for HealthMonitor<C>
where
    C: Clock + Send + Sync,
{
    async fn check_health(&self) -> RollbackPortResult<bool> {
        let report = Self::check_health(self).await;
        Ok(report.healthy && self.is_healthy())
    }
}
