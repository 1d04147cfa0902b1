//! Aggregated system health.

use super::{HealthStatusEntry, MetricThresholds, SystemMetrics};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Returns whether `healthy` out of `total` meets the 80% healthy ratio.
///
/// The boundary is inclusive and an empty population is healthy. The ratio
/// is compared by cross-multiplication so 4 of 5 is exactly on the boundary.
#[must_use]
pub const fn meets_healthy_ratio(healthy: usize, total: usize) -> bool {
    total == 0 || healthy.saturating_mul(5) >= total.saturating_mul(4)
}

/// Overall verdict plus everything that contributed to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemHealthSnapshot {
    /// Overall health verdict.
    pub status: bool,
    /// Latest probe entry per service.
    pub services: BTreeMap<String, HealthStatusEntry>,
    /// Latest probe entry per agent.
    pub agents: BTreeMap<String, HealthStatusEntry>,
    /// Current metric values.
    pub metrics: SystemMetrics,
    /// Active thresholds.
    pub thresholds: MetricThresholds,
    /// When the snapshot was taken.
    pub checked_at: DateTime<Utc>,
}
