//! Domain model for health monitoring.
//!
//! Probe results, tracked metrics and thresholds, the aggregated system
//! snapshot and self-reported agent health live here.

mod entry;
mod error;
mod metrics;
mod report;
mod snapshot;
mod status;

pub use entry::HealthStatusEntry;
pub use error::{ParseHealthStatusError, ParseTrackedMetricError};
pub use metrics::{MetricThresholds, SystemMetrics, TrackedMetric};
pub use report::{AgentHealthReport, HealthCheckReport};
pub use snapshot::{SystemHealthSnapshot, meets_healthy_ratio};
pub use status::HealthStatus;
