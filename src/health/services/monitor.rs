//! Service layer for service and agent health monitoring.

use crate::AttributeMap;
use crate::health::{
    domain::{
        AgentHealthReport, HealthCheckReport, HealthStatus, HealthStatusEntry, MetricThresholds,
        SystemHealthSnapshot, SystemMetrics, TrackedMetric, meets_healthy_ratio,
    },
    ports::{AgentHealthReporter, ProbeResult, ProbeTarget},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::any::type_name;
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, error, info, warn};

/// Which probed population an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProbeKind {
    Service,
    Agent,
}

impl ProbeKind {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Service => "service",
            Self::Agent => "agent",
        }
    }
}

#[derive(Debug, Clone)]
struct MonitorState {
    services: BTreeMap<String, HealthStatusEntry>,
    agents: BTreeMap<String, HealthStatusEntry>,
    metrics: SystemMetrics,
    thresholds: MetricThresholds,
    healthy: bool,
}

impl MonitorState {
    fn new(thresholds: MetricThresholds) -> Self {
        Self {
            services: BTreeMap::new(),
            agents: BTreeMap::new(),
            metrics: SystemMetrics::default(),
            thresholds,
            healthy: true,
        }
    }

    fn entries_mut(&mut self, kind: ProbeKind) -> &mut BTreeMap<String, HealthStatusEntry> {
        match kind {
            ProbeKind::Service => &mut self.services,
            ProbeKind::Agent => &mut self.agents,
        }
    }

    fn recompute(&mut self) {
        let (healthy_services, total_services) = count_healthy(&self.services);
        let (healthy_agents, total_agents) = count_healthy(&self.agents);
        self.metrics.healthy_services = healthy_services;
        self.metrics.total_services = total_services;
        self.metrics.healthy_agents = healthy_agents;
        self.metrics.total_agents = total_agents;

        let breaches = self.thresholds.breaches(&self.metrics);
        if !breaches.is_empty() {
            debug!(?breaches, "metric thresholds exceeded");
        }
        self.healthy = meets_healthy_ratio(healthy_services, total_services)
            && meets_healthy_ratio(healthy_agents, total_agents)
            && breaches.is_empty();
    }

    fn snapshot(&self, checked_at: DateTime<Utc>) -> SystemHealthSnapshot {
        SystemHealthSnapshot {
            status: self.healthy,
            services: self.services.clone(),
            agents: self.agents.clone(),
            metrics: self.metrics,
            thresholds: self.thresholds,
            checked_at,
        }
    }
}

fn count_healthy(entries: &BTreeMap<String, HealthStatusEntry>) -> (usize, usize) {
    let healthy = entries
        .values()
        .filter(|entry| entry.status().is_healthy())
        .count();
    (healthy, entries.len())
}

/// Health monitoring service.
///
/// Two stores are kept apart: probe entries for services and agents, which
/// feed the [`SystemHealthSnapshot`], and self-reporting agents keyed by
/// their concrete type, which are only polled through
/// [`HealthMonitor::get_health_status`] and [`HealthMonitor::check_health`].
pub struct HealthMonitor<C>
where
    C: Clock + Send + Sync,
{
    clock: Arc<C>,
    default_thresholds: MetricThresholds,
    state: RwLock<MonitorState>,
    reporters: RwLock<BTreeMap<String, Arc<dyn AgentHealthReporter>>>,
}

impl<C> HealthMonitor<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a monitor using the default thresholds.
    #[must_use]
    pub fn new(clock: Arc<C>) -> Self {
        Self::with_thresholds(clock, MetricThresholds::default())
    }

    /// Creates a monitor using the supplied thresholds.
    ///
    /// [`HealthMonitor::reset`] restores these thresholds.
    #[must_use]
    pub fn with_thresholds(clock: Arc<C>, thresholds: MetricThresholds) -> Self {
        Self {
            clock,
            default_thresholds: thresholds,
            state: RwLock::new(MonitorState::new(thresholds)),
            reporters: RwLock::new(BTreeMap::new()),
        }
    }

    /// Probes a service and stores the result under `service_id`.
    ///
    /// Probe failures are recorded as an `error` entry and never returned.
    pub async fn check_service_health(
        &self,
        service_id: &str,
        target: &dyn ProbeTarget,
    ) -> HealthStatusEntry {
        self.check(ProbeKind::Service, service_id, target).await
    }

    /// Probes an agent and stores the result under `agent_id`.
    ///
    /// Probe failures are recorded as an `error` entry and never returned.
    pub async fn check_agent_health(
        &self,
        agent_id: &str,
        target: &dyn ProbeTarget,
    ) -> HealthStatusEntry {
        self.check(ProbeKind::Agent, agent_id, target).await
    }

    /// Returns the current system health snapshot.
    #[must_use]
    pub fn get_system_health(&self) -> SystemHealthSnapshot {
        let mut state = self.write_state();
        state.recompute();
        state.snapshot(self.clock.utc())
    }

    /// Returns whether the system is currently healthy.
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.read_state().healthy
    }

    /// Sets a tracked gauge value.
    ///
    /// Returns `false` and leaves state untouched when `name` is not a
    /// tracked metric or `value` is not finite.
    pub fn set_metric(&self, name: &str, value: f64) -> bool {
        let Ok(metric) = TrackedMetric::try_from(name) else {
            warn!(metric = name, "ignoring update for untracked metric");
            return false;
        };
        if !value.is_finite() {
            warn!(%metric, value, "ignoring non-finite metric value");
            return false;
        }
        let mut state = self.write_state();
        state.metrics.set_value(metric, value);
        state.recompute();
        true
    }

    /// Sets a tracked gauge ceiling.
    ///
    /// Returns `false` and leaves state untouched when `name` is not a
    /// tracked metric or `value` is negative or not finite.
    pub fn set_threshold(&self, name: &str, value: f64) -> bool {
        let Ok(metric) = TrackedMetric::try_from(name) else {
            warn!(metric = name, "ignoring threshold for untracked metric");
            return false;
        };
        if !MetricThresholds::is_valid_ceiling(value) {
            warn!(%metric, value, "ignoring invalid metric threshold");
            return false;
        }
        let mut state = self.write_state();
        state.thresholds.set_value(metric, value);
        state.recompute();
        true
    }

    /// Registers a self-reporting agent keyed by its concrete type.
    ///
    /// A later registration of the same type replaces the earlier one. The
    /// returned key identifies the agent in health reports.
    pub fn register_agent<A>(&self, agent: Arc<A>) -> String
    where
        A: AgentHealthReporter + 'static,
    {
        let kind = type_name::<A>().to_owned();
        let mut reporters = self.write_reporters();
        if reporters.insert(kind.clone(), agent).is_some() {
            debug!(agent_kind = %kind, "replaced self-reporting agent");
        } else {
            info!(agent_kind = %kind, "registered self-reporting agent");
        }
        kind
    }

    /// Removes the self-reporting agent registered for `A`'s type.
    ///
    /// Returns `true` when an agent was removed.
    pub fn unregister_agent<A>(&self, _agent: &A) -> bool
    where
        A: AgentHealthReporter + 'static,
    {
        let kind = type_name::<A>();
        let removed = self.write_reporters().remove(kind).is_some();
        if removed {
            info!(agent_kind = kind, "unregistered self-reporting agent");
        }
        removed
    }

    /// Returns the keys of every registered self-reporting agent.
    #[must_use]
    pub fn registered_agent_kinds(&self) -> Vec<String> {
        self.read_reporters().keys().cloned().collect()
    }

    /// Polls every self-reporting agent.
    ///
    /// A reporter that fails is reported unhealthy with the error message.
    pub async fn get_health_status(&self) -> BTreeMap<String, AgentHealthReport> {
        let reporters: Vec<_> = self
            .read_reporters()
            .iter()
            .map(|(kind, reporter)| (kind.clone(), Arc::clone(reporter)))
            .collect();

        let mut reports = BTreeMap::new();
        for (kind, reporter) in reporters {
            let report = match reporter.health_status().await {
                Ok(report) => report,
                Err(err) => {
                    error!(agent_kind = %kind, error = %err, "agent health report failed");
                    AgentHealthReport::failed(err.to_string())
                }
            };
            reports.insert(kind, report);
        }
        reports
    }

    /// Polls every self-reporting agent and aggregates the results.
    pub async fn check_health(&self) -> HealthCheckReport {
        let reports = self.get_health_status().await;
        HealthCheckReport::from_reports(reports, self.clock.utc())
    }

    /// Clears both stores and restores the construction-time thresholds.
    pub fn reset(&self) {
        *self.write_state() = MonitorState::new(self.default_thresholds);
        self.write_reporters().clear();
        info!("health monitor reset");
    }

    async fn check(
        &self,
        kind: ProbeKind,
        id: &str,
        target: &dyn ProbeTarget,
    ) -> HealthStatusEntry {
        let name = target.display_name().unwrap_or_else(|| id.to_owned());
        let probed = probe(target).await;
        let checked_at = self.clock.utc();
        let entry = match probed {
            Ok((status, metrics)) => {
                debug!(kind = kind.as_str(), id, %status, "probe completed");
                HealthStatusEntry::new(id, name, status, checked_at).with_metrics(metrics)
            }
            Err(err) => {
                error!(kind = kind.as_str(), id, error = %err, "probe failed");
                HealthStatusEntry::failed(id, name, checked_at, err.to_string())
            }
        };

        let mut state = self.write_state();
        state.entries_mut(kind).insert(id.to_owned(), entry.clone());
        state.recompute();
        entry
    }

    fn read_state(&self) -> RwLockReadGuard<'_, MonitorState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, MonitorState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn read_reporters(&self) -> RwLockReadGuard<'_, BTreeMap<String, Arc<dyn AgentHealthReporter>>> {
        self.reporters.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_reporters(
        &self,
    ) -> RwLockWriteGuard<'_, BTreeMap<String, Arc<dyn AgentHealthReporter>>> {
        self.reporters.write().unwrap_or_else(PoisonError::into_inner)
    }
}

async fn probe(target: &dyn ProbeTarget) -> ProbeResult<(HealthStatus, AttributeMap)> {
    let status = if let Some(checkable) = target.as_health_checkable() {
        if checkable.is_healthy().await? {
            HealthStatus::Healthy
        } else {
            HealthStatus::Unhealthy
        }
    } else if let Some(running) = target.as_running_probe() {
        if running.is_running().await? {
            HealthStatus::Healthy
        } else {
            HealthStatus::Stopped
        }
    } else {
        HealthStatus::Unknown
    };

    let metrics = match target.as_metrics_provider() {
        Some(provider) => provider.metrics().await?,
        None => AttributeMap::new(),
    };
    Ok((status, metrics))
}
