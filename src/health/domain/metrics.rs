//! System metrics and the thresholds that gate overall health.

use super::ParseTrackedMetricError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Gauge metrics whose values are compared against thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackedMetric {
    /// Memory usage percentage.
    MemoryUsage,
    /// CPU usage percentage.
    CpuUsage,
    /// Response time in milliseconds.
    ResponseTime,
    /// Error rate percentage.
    ErrorRate,
}

impl TrackedMetric {
    /// Every tracked metric in reporting order.
    pub const ALL: [Self; 4] = [
        Self::MemoryUsage,
        Self::CpuUsage,
        Self::ResponseTime,
        Self::ErrorRate,
    ];

    /// Returns the canonical metric name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MemoryUsage => "memory_usage",
            Self::CpuUsage => "cpu_usage",
            Self::ResponseTime => "response_time",
            Self::ErrorRate => "error_rate",
        }
    }
}

impl fmt::Display for TrackedMetric {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TrackedMetric {
    type Error = ParseTrackedMetricError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "memory_usage" => Ok(Self::MemoryUsage),
            "cpu_usage" => Ok(Self::CpuUsage),
            "response_time" => Ok(Self::ResponseTime),
            "error_rate" => Ok(Self::ErrorRate),
            _ => Err(ParseTrackedMetricError(value.to_owned())),
        }
    }
}

/// Current system metric values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemMetrics {
    /// Memory usage percentage.
    pub memory_usage: f64,
    /// CPU usage percentage.
    pub cpu_usage: f64,
    /// Response time in milliseconds.
    pub response_time: f64,
    /// Error rate percentage.
    pub error_rate: f64,
    /// Number of probed services.
    pub total_services: usize,
    /// Number of probed services whose latest status is healthy.
    pub healthy_services: usize,
    /// Number of probed agents.
    pub total_agents: usize,
    /// Number of probed agents whose latest status is healthy.
    pub healthy_agents: usize,
}

impl SystemMetrics {
    /// Returns the value of a tracked gauge.
    #[must_use]
    pub const fn value(&self, metric: TrackedMetric) -> f64 {
        match metric {
            TrackedMetric::MemoryUsage => self.memory_usage,
            TrackedMetric::CpuUsage => self.cpu_usage,
            TrackedMetric::ResponseTime => self.response_time,
            TrackedMetric::ErrorRate => self.error_rate,
        }
    }

    /// Sets the value of a tracked gauge.
    pub const fn set_value(&mut self, metric: TrackedMetric, value: f64) {
        match metric {
            TrackedMetric::MemoryUsage => self.memory_usage = value,
            TrackedMetric::CpuUsage => self.cpu_usage = value,
            TrackedMetric::ResponseTime => self.response_time = value,
            TrackedMetric::ErrorRate => self.error_rate = value,
        }
    }
}

/// Ceilings for tracked gauges. A value strictly above its ceiling marks the
/// system unhealthy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricThresholds {
    /// Memory usage ceiling, percent.
    pub memory_usage: f64,
    /// CPU usage ceiling, percent.
    pub cpu_usage: f64,
    /// Response time ceiling, milliseconds.
    pub response_time: f64,
    /// Error rate ceiling, percent.
    pub error_rate: f64,
}

impl Default for MetricThresholds {
    fn default() -> Self {
        Self {
            memory_usage: 90.0,
            cpu_usage: 80.0,
            response_time: 1000.0,
            error_rate: 5.0,
        }
    }
}

impl MetricThresholds {
    /// Returns whether `value` can serve as a ceiling: finite and not
    /// negative.
    #[must_use]
    pub const fn is_valid_ceiling(value: f64) -> bool {
        value.is_finite() && value >= 0.0
    }

    /// Returns the ceiling for a tracked gauge.
    #[must_use]
    pub const fn value(&self, metric: TrackedMetric) -> f64 {
        match metric {
            TrackedMetric::MemoryUsage => self.memory_usage,
            TrackedMetric::CpuUsage => self.cpu_usage,
            TrackedMetric::ResponseTime => self.response_time,
            TrackedMetric::ErrorRate => self.error_rate,
        }
    }

    /// Sets the ceiling for a tracked gauge.
    pub const fn set_value(&mut self, metric: TrackedMetric, value: f64) {
        match metric {
            TrackedMetric::MemoryUsage => self.memory_usage = value,
            TrackedMetric::CpuUsage => self.cpu_usage = value,
            TrackedMetric::ResponseTime => self.response_time = value,
            TrackedMetric::ErrorRate => self.error_rate = value,
        }
    }

    /// Returns the gauges whose value exceeds their ceiling.
    #[must_use]
    pub fn breaches(&self, metrics: &SystemMetrics) -> Vec<TrackedMetric> {
        TrackedMetric::ALL
            .into_iter()
            .filter(|metric| metrics.value(*metric) > self.value(*metric))
            .collect()
    }
}
