//! Agent record aggregate root.

use super::{AgentId, AgentLifecycleState, AgentMetrics};
use crate::AttributeMap;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// A single hook failure recorded against an agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentErrorEntry {
    message: String,
    timestamp: DateTime<Utc>,
    trace: Option<String>,
}

impl AgentErrorEntry {
    /// Creates an error entry.
    ///
    /// An empty or whitespace-only trace is dropped.
    #[must_use]
    pub fn new(
        message: impl Into<String>,
        timestamp: DateTime<Utc>,
        trace: Option<String>,
    ) -> Self {
        Self {
            message: message.into(),
            timestamp,
            trace: trace
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty()),
        }
    }

    /// Returns the error message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns when the error was recorded.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Returns the rendered error source chain, if any.
    #[must_use]
    pub fn trace(&self) -> Option<&str> {
        self.trace.as_deref()
    }
}

/// Supervision record for a registered agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentRecord {
    id: AgentId,
    state: AgentLifecycleState,
    registered_at: DateTime<Utc>,
    last_active: DateTime<Utc>,
    started_at: Option<DateTime<Utc>>,
    stopped_at: Option<DateTime<Utc>>,
    error_count: u32,
    restart_count: u32,
    config: AttributeMap,
    metrics: AgentMetrics,
    last_error: Option<AgentErrorEntry>,
    error_log: Vec<AgentErrorEntry>,
}

impl AgentRecord {
    /// Creates a record in the `registered` state with zeroed counters.
    #[must_use]
    pub fn new(id: AgentId, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id,
            state: AgentLifecycleState::Registered,
            registered_at: timestamp,
            last_active: timestamp,
            started_at: None,
            stopped_at: None,
            error_count: 0,
            restart_count: 0,
            config: AttributeMap::new(),
            metrics: AgentMetrics::new(),
            last_error: None,
            error_log: Vec::new(),
        }
    }

    /// Returns the agent identifier.
    #[must_use]
    pub const fn id(&self) -> &AgentId {
        &self.id
    }

    /// Returns the lifecycle state.
    #[must_use]
    pub const fn state(&self) -> AgentLifecycleState {
        self.state
    }

    /// Returns the registration timestamp.
    #[must_use]
    pub const fn registered_at(&self) -> DateTime<Utc> {
        self.registered_at
    }

    /// Returns the last time the agent was started or stopped.
    #[must_use]
    pub const fn last_active(&self) -> DateTime<Utc> {
        self.last_active
    }

    /// Returns the most recent start timestamp.
    #[must_use]
    pub const fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Returns the most recent stop timestamp.
    #[must_use]
    pub const fn stopped_at(&self) -> Option<DateTime<Utc>> {
        self.stopped_at
    }

    /// Returns the number of recorded hook failures.
    #[must_use]
    pub const fn error_count(&self) -> u32 {
        self.error_count
    }

    /// Returns the number of completed restarts.
    #[must_use]
    pub const fn restart_count(&self) -> u32 {
        self.restart_count
    }

    /// Returns the stored configuration.
    #[must_use]
    pub const fn config(&self) -> &AttributeMap {
        &self.config
    }

    /// Returns the recorded metrics.
    #[must_use]
    pub const fn metrics(&self) -> &AgentMetrics {
        &self.metrics
    }

    /// Returns the latest hook failure.
    #[must_use]
    pub const fn last_error(&self) -> Option<&AgentErrorEntry> {
        self.last_error.as_ref()
    }

    /// Returns every hook failure in recording order.
    #[must_use]
    pub fn error_log(&self) -> &[AgentErrorEntry] {
        &self.error_log
    }

    /// Marks the agent as running.
    pub fn mark_started(&mut self, clock: &impl Clock) {
        let timestamp = clock.utc();
        self.state = AgentLifecycleState::Running;
        self.started_at = Some(timestamp);
        self.last_active = timestamp;
    }

    /// Marks the agent as stopped.
    pub fn mark_stopped(&mut self, clock: &impl Clock) {
        let timestamp = clock.utc();
        self.state = AgentLifecycleState::Stopped;
        self.stopped_at = Some(timestamp);
        self.last_active = timestamp;
    }

    /// Counts a completed stop/start cycle.
    pub const fn record_restart(&mut self) {
        self.restart_count = self.restart_count.saturating_add(1);
    }

    /// Records a hook failure and returns the updated error count.
    pub fn record_error(&mut self, entry: AgentErrorEntry) -> u32 {
        self.error_count = self.error_count.saturating_add(1);
        self.last_error = Some(entry.clone());
        self.error_log.push(entry);
        self.error_count
    }

    /// Replaces the stored configuration wholesale.
    pub fn replace_config(&mut self, config: AttributeMap) {
        self.config = config;
    }

    /// Merges metric values and refreshes their timestamp.
    pub fn merge_metrics(&mut self, values: AttributeMap, clock: &impl Clock) {
        self.metrics.merge(values, clock);
    }

    /// Builds the listing summary for this record.
    #[must_use]
    pub fn summary(&self) -> AgentSummary {
        AgentSummary {
            id: self.id.clone(),
            state: self.state,
            config: self.config.clone(),
            metrics: self.metrics.clone(),
            error_count: self.error_count,
        }
    }
}

/// Listing view of a registered agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSummary {
    /// Agent identifier.
    pub id: AgentId,
    /// Current lifecycle state.
    pub state: AgentLifecycleState,
    /// Stored configuration.
    pub config: AttributeMap,
    /// Recorded metrics.
    pub metrics: AgentMetrics,
    /// Number of recorded hook failures.
    pub error_count: u32,
}
