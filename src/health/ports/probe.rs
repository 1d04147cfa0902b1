//! Capabilities a probed service or agent may expose.
//!
//! A probe target implements [`ProbeTarget`] and returns `Some(self)` from
//! the accessor of every capability it supports. Targets without any
//! capability are reported with an `unknown` status.

use crate::AttributeMap;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for probe capability calls.
pub type ProbeResult<T> = Result<T, ProbeError>;

/// Reports whether the target considers itself healthy.
#[async_trait]
pub trait HealthCheckable: Send + Sync {
    /// Returns `true` when the target is healthy.
    async fn is_healthy(&self) -> ProbeResult<bool>;
}

/// Reports whether the target is running.
#[async_trait]
pub trait RunningProbe: Send + Sync {
    /// Returns `true` when the target is running.
    async fn is_running(&self) -> ProbeResult<bool>;
}

/// Exposes a metrics snapshot captured alongside the probe.
#[async_trait]
pub trait MetricsProvider: Send + Sync {
    /// Returns the current metrics.
    async fn metrics(&self) -> ProbeResult<AttributeMap>;
}

/// A service or agent the health monitor can probe.
pub trait ProbeTarget: Send + Sync {
    /// Returns a display name. The probe identifier is used when absent.
    fn display_name(&self) -> Option<String> {
        None
    }

    /// Returns the health check capability, if supported.
    fn as_health_checkable(&self) -> Option<&dyn HealthCheckable> {
        None
    }

    /// Returns the running probe capability, if supported.
    fn as_running_probe(&self) -> Option<&dyn RunningProbe> {
        None
    }

    /// Returns the metrics capability, if supported.
    fn as_metrics_provider(&self) -> Option<&dyn MetricsProvider> {
        None
    }
}

/// Errors raised by probe capabilities.
#[derive(Debug, Clone, Error)]
pub enum ProbeError {
    /// The target could not be reached.
    #[error("probe target unavailable: {0}")]
    Unavailable(String),

    /// The probe failed with an underlying error.
    #[error("probe failed: {0}")]
    Runtime(Arc<dyn std::error::Error + Send + Sync>),
}

impl ProbeError {
    /// Creates an unavailability error with a message.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }

    /// Wraps a runtime error raised by the probe.
    pub fn runtime(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Runtime(Arc::new(err))
    }
}
