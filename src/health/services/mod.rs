//! Orchestration services for health monitoring.

mod monitor;

pub use monitor::HealthMonitor;
