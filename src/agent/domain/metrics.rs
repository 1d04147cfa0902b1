//! Per-agent metric snapshots.

use crate::AttributeMap;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Metrics recorded for an agent by its operators.
///
/// Values are merged key by key; `recorded_at` tracks the latest write.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentMetrics {
    values: AttributeMap,
    recorded_at: Option<DateTime<Utc>>,
}

impl AgentMetrics {
    /// Creates an empty metrics map with no recording timestamp.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges `values` over the current map and refreshes `recorded_at`.
    ///
    /// Keys absent from `values` keep their previous value.
    pub fn merge(&mut self, values: AttributeMap, clock: &impl Clock) {
        self.values.extend(values);
        self.recorded_at = Some(clock.utc());
    }

    /// Returns the merged metric values.
    #[must_use]
    pub const fn values(&self) -> &AttributeMap {
        &self.values
    }

    /// Returns a single metric value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.values.get(key)
    }

    /// Returns when metrics were last recorded.
    #[must_use]
    pub const fn recorded_at(&self) -> Option<DateTime<Utc>> {
        self.recorded_at
    }
}
