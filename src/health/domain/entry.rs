//! Latest probe result for a service or agent.

use super::HealthStatus;
use crate::AttributeMap;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Result of the most recent probe of one service or agent.
///
/// Every probe replaces the previous entry for the same identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatusEntry {
    id: String,
    name: String,
    status: HealthStatus,
    last_check: DateTime<Utc>,
    metrics: AttributeMap,
    error: Option<String>,
}

impl HealthStatusEntry {
    /// Creates an entry without metrics or error details.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        status: HealthStatus,
        last_check: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            status,
            last_check,
            metrics: AttributeMap::new(),
            error: None,
        }
    }

    /// Creates an `error` entry carrying the probe failure message.
    #[must_use]
    pub fn failed(
        id: impl Into<String>,
        name: impl Into<String>,
        last_check: DateTime<Utc>,
        message: impl Into<String>,
    ) -> Self {
        let mut entry = Self::new(id, name, HealthStatus::Error, last_check);
        entry.error = Some(message.into());
        entry
    }

    /// Attaches the metrics captured during the probe.
    #[must_use]
    pub fn with_metrics(mut self, metrics: AttributeMap) -> Self {
        self.metrics = metrics;
        self
    }

    /// Returns the probed identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the probed status.
    #[must_use]
    pub const fn status(&self) -> HealthStatus {
        self.status
    }

    /// Returns when the probe ran.
    #[must_use]
    pub const fn last_check(&self) -> DateTime<Utc> {
        self.last_check
    }

    /// Returns the captured metrics.
    #[must_use]
    pub const fn metrics(&self) -> &AttributeMap {
        &self.metrics
    }

    /// Returns the probe failure message, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
