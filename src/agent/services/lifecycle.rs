//! Service layer for agent lifecycle supervision.

use crate::AttributeMap;
use crate::agent::{
    domain::{
        AgentErrorEntry, AgentId, AgentLifecycleState, AgentMetrics, AgentRecord, AgentSummary,
    },
    ports::{AgentHookError, AgentRecordRepository, AgentRecordRepositoryError, ManagedAgent},
};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;
use tracing::{error, info, warn};

/// Error count a single agent may reach before the manager reports itself
/// unhealthy. The flag flips once the count exceeds this value.
pub const AGENT_ERROR_THRESHOLD: u32 = 5;

/// Lifecycle hook that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentHook {
    /// The start hook.
    Start,
    /// The stop hook.
    Stop,
    /// The configuration hook.
    Configure,
}

impl AgentHook {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Configure => "configure",
        }
    }
}

impl fmt::Display for AgentHook {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Service-level errors for agent lifecycle operations.
#[derive(Debug, Error)]
pub enum AgentLifecycleError {
    /// An agent with the same identifier is already registered.
    #[error("agent {0} is already registered")]
    DuplicateRegistration(AgentId),

    /// No agent is registered under the identifier.
    #[error("agent {0} is not registered")]
    NotRegistered(AgentId),

    /// An agent hook failed. The failure has been recorded on the agent.
    #[error("{hook} hook failed for agent {agent_id}: {source}")]
    HookFailure {
        /// Agent whose hook failed.
        agent_id: AgentId,
        /// Hook that failed.
        hook: AgentHook,
        /// Error raised by the hook.
        source: AgentHookError,
    },

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] AgentRecordRepositoryError),
}

/// Result type for lifecycle service operations.
pub type AgentLifecycleResult<T> = Result<T, AgentLifecycleError>;

/// Outcome of tearing down the lifecycle manager.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShutdownReport {
    /// Agents that were running and stopped cleanly.
    pub stopped: Vec<AgentId>,
    /// Agents whose stop sequence failed, with the failure message.
    pub failed: Vec<(AgentId, String)>,
}

/// Agent lifecycle supervision service.
///
/// Records live behind the repository port; live agent instances are held
/// by the service itself for as long as it exists.
pub struct AgentLifecycleService<R, C>
where
    R: AgentRecordRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
    agents: RwLock<HashMap<AgentId, Arc<dyn ManagedAgent>>>,
    healthy: AtomicBool,
}

impl<R, C> AgentLifecycleService<R, C>
where
    R: AgentRecordRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new lifecycle service with no registered agents.
    #[must_use]
    pub fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self {
            repository,
            clock,
            agents: RwLock::new(HashMap::new()),
            healthy: AtomicBool::new(true),
        }
    }

    /// Returns the manager-wide health flag.
    ///
    /// The flag turns false as soon as any single agent records more than
    /// [`AGENT_ERROR_THRESHOLD`] hook failures.
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.healthy.load(Ordering::SeqCst)
    }

    /// Registers an agent under `agent_id`.
    ///
    /// # Errors
    ///
    /// Returns [`AgentLifecycleError::DuplicateRegistration`] when the
    /// identifier is taken, or repository errors.
    pub async fn register_agent(
        &self,
        agent_id: AgentId,
        agent: Arc<dyn ManagedAgent>,
    ) -> AgentLifecycleResult<AgentRecord> {
        let record = AgentRecord::new(agent_id.clone(), &*self.clock);
        self.repository
            .insert(&record)
            .await
            .map_err(|err| match err {
                AgentRecordRepositoryError::Duplicate(id) => {
                    AgentLifecycleError::DuplicateRegistration(id)
                }
                other => other.into(),
            })?;

        self.agents_mut().insert(agent_id.clone(), agent);
        info!(agent_id = %agent_id, "agent registered");
        Ok(record)
    }

    /// Unregisters an agent, stopping it first when it is running.
    ///
    /// # Errors
    ///
    /// Returns [`AgentLifecycleError::NotRegistered`] when the agent is
    /// unknown, [`AgentLifecycleError::HookFailure`] when the stop hook fails
    /// (the agent then stays registered), or repository errors.
    pub async fn unregister_agent(&self, agent_id: &AgentId) -> AgentLifecycleResult<()> {
        let record = self.find_record_or_error(agent_id).await?;
        if record.state().is_running() {
            self.stop_agent(agent_id).await?;
        }

        self.repository.remove(agent_id).await?;
        self.agents_mut().remove(agent_id);
        info!(agent_id = %agent_id, "agent unregistered");
        Ok(())
    }

    /// Starts an agent through its start hook when it has one.
    ///
    /// # Errors
    ///
    /// Returns [`AgentLifecycleError::NotRegistered`] when the agent is
    /// unknown, [`AgentLifecycleError::HookFailure`] after recording a hook
    /// failure, or repository errors.
    pub async fn start_agent(&self, agent_id: &AgentId) -> AgentLifecycleResult<AgentRecord> {
        let mut record = self.find_record_or_error(agent_id).await?;
        let agent = self.instance_or_error(agent_id)?;

        if let Some(hook) = agent.as_startable()
            && let Err(err) = hook.start().await
        {
            return Err(self.record_hook_failure(record, AgentHook::Start, err).await);
        }

        record.mark_started(&*self.clock);
        self.repository.update(&record).await?;
        info!(agent_id = %agent_id, "agent started");
        Ok(record)
    }

    /// Stops an agent through its stop hook when it has one.
    ///
    /// # Errors
    ///
    /// Returns [`AgentLifecycleError::NotRegistered`] when the agent is
    /// unknown, [`AgentLifecycleError::HookFailure`] after recording a hook
    /// failure, or repository errors.
    pub async fn stop_agent(&self, agent_id: &AgentId) -> AgentLifecycleResult<AgentRecord> {
        let mut record = self.find_record_or_error(agent_id).await?;
        let agent = self.instance_or_error(agent_id)?;

        if let Some(hook) = agent.as_stoppable()
            && let Err(err) = hook.stop().await
        {
            return Err(self.record_hook_failure(record, AgentHook::Stop, err).await);
        }

        record.mark_stopped(&*self.clock);
        self.repository.update(&record).await?;
        info!(agent_id = %agent_id, "agent stopped");
        Ok(record)
    }

    /// Stops and then starts an agent.
    ///
    /// The restart counter only advances when both steps succeed.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by the stop or start sequence.
    pub async fn restart_agent(&self, agent_id: &AgentId) -> AgentLifecycleResult<AgentRecord> {
        self.stop_agent(agent_id).await?;
        let mut record = self.start_agent(agent_id).await?;
        record.record_restart();
        self.repository.update(&record).await?;
        info!(
            agent_id = %agent_id,
            restart_count = record.restart_count(),
            "agent restarted"
        );
        Ok(record)
    }

    /// Replaces an agent's configuration, forwarding it to the agent's
    /// configuration hook when it has one.
    ///
    /// # Errors
    ///
    /// Returns [`AgentLifecycleError::NotRegistered`] when the agent is
    /// unknown, [`AgentLifecycleError::HookFailure`] after recording a hook
    /// failure, or repository errors.
    pub async fn update_agent_config(
        &self,
        agent_id: &AgentId,
        config: AttributeMap,
    ) -> AgentLifecycleResult<AgentRecord> {
        let mut record = self.find_record_or_error(agent_id).await?;
        let agent = self.instance_or_error(agent_id)?;

        if let Some(hook) = agent.as_configurable()
            && let Err(err) = hook.apply_config(&config).await
        {
            return Err(self
                .record_hook_failure(record, AgentHook::Configure, err)
                .await);
        }

        record.replace_config(config);
        self.repository.update(&record).await?;
        Ok(record)
    }

    /// Returns an agent's stored configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AgentLifecycleError::NotRegistered`] when the agent is
    /// unknown, or repository errors.
    pub async fn get_agent_config(&self, agent_id: &AgentId) -> AgentLifecycleResult<AttributeMap> {
        Ok(self.find_record_or_error(agent_id).await?.config().clone())
    }

    /// Merges metric values into an agent's metrics.
    ///
    /// # Errors
    ///
    /// Returns [`AgentLifecycleError::NotRegistered`] when the agent is
    /// unknown, or repository errors.
    pub async fn record_agent_metrics(
        &self,
        agent_id: &AgentId,
        metrics: AttributeMap,
    ) -> AgentLifecycleResult<AgentMetrics> {
        let mut record = self.find_record_or_error(agent_id).await?;
        record.merge_metrics(metrics, &*self.clock);
        self.repository.update(&record).await?;
        Ok(record.metrics().clone())
    }

    /// Returns an agent's recorded metrics.
    ///
    /// # Errors
    ///
    /// Returns [`AgentLifecycleError::NotRegistered`] when the agent is
    /// unknown, or repository errors.
    pub async fn get_agent_metrics(&self, agent_id: &AgentId) -> AgentLifecycleResult<AgentMetrics> {
        Ok(self.find_record_or_error(agent_id).await?.metrics().clone())
    }

    /// Returns an agent's lifecycle state.
    ///
    /// # Errors
    ///
    /// Returns [`AgentLifecycleError::NotRegistered`] when the agent is
    /// unknown, or repository errors.
    pub async fn get_agent_state(
        &self,
        agent_id: &AgentId,
    ) -> AgentLifecycleResult<AgentLifecycleState> {
        Ok(self.find_record_or_error(agent_id).await?.state())
    }

    /// Returns an agent's hook failures in recording order.
    ///
    /// # Errors
    ///
    /// Returns [`AgentLifecycleError::NotRegistered`] when the agent is
    /// unknown, or repository errors.
    pub async fn get_agent_errors(
        &self,
        agent_id: &AgentId,
    ) -> AgentLifecycleResult<Vec<AgentErrorEntry>> {
        Ok(self.find_record_or_error(agent_id).await?.error_log().to_vec())
    }

    /// Returns the full supervision record of an agent.
    ///
    /// # Errors
    ///
    /// Returns [`AgentLifecycleError::NotRegistered`] when the agent is
    /// unknown, or repository errors.
    pub async fn get_agent(&self, agent_id: &AgentId) -> AgentLifecycleResult<AgentRecord> {
        self.find_record_or_error(agent_id).await
    }

    /// Returns whether an agent is running.
    ///
    /// # Errors
    ///
    /// Returns [`AgentLifecycleError::NotRegistered`] when the agent is
    /// unknown, or repository errors.
    pub async fn is_agent_running(&self, agent_id: &AgentId) -> AgentLifecycleResult<bool> {
        Ok(self.get_agent_state(agent_id).await?.is_running())
    }

    /// Lists every registered agent ordered by identifier.
    ///
    /// # Errors
    ///
    /// Returns repository errors.
    pub async fn get_registered_agents(&self) -> AgentLifecycleResult<Vec<AgentSummary>> {
        let mut summaries: Vec<AgentSummary> = self
            .repository
            .list_all()
            .await?
            .iter()
            .map(AgentRecord::summary)
            .collect();
        summaries.sort_by(|left, right| left.id.cmp(&right.id));
        Ok(summaries)
    }

    /// Stops every running agent and clears all supervision state.
    ///
    /// Stop failures are collected rather than returned; the manager is
    /// emptied and its health flag reset either way.
    ///
    /// # Errors
    ///
    /// Returns repository errors raised while listing or clearing records.
    pub async fn shutdown(&self) -> AgentLifecycleResult<ShutdownReport> {
        let mut running: Vec<AgentId> = self
            .repository
            .list_all()
            .await?
            .into_iter()
            .filter(|record| record.state().is_running())
            .map(|record| record.id().clone())
            .collect();
        running.sort();

        let mut report = ShutdownReport::default();
        for agent_id in running {
            match self.stop_agent(&agent_id).await {
                Ok(_) => report.stopped.push(agent_id),
                Err(err) => {
                    warn!(agent_id = %agent_id, error = %err, "agent failed to stop during shutdown");
                    report.failed.push((agent_id, err.to_string()));
                }
            }
        }

        self.repository.clear().await?;
        self.agents_mut().clear();
        self.healthy.store(true, Ordering::SeqCst);
        info!(
            stopped = report.stopped.len(),
            failed = report.failed.len(),
            "lifecycle manager shut down"
        );
        Ok(report)
    }

    async fn find_record_or_error(&self, agent_id: &AgentId) -> AgentLifecycleResult<AgentRecord> {
        self.repository
            .find(agent_id)
            .await?
            .ok_or_else(|| AgentLifecycleError::NotRegistered(agent_id.clone()))
    }

    fn instance_or_error(&self, agent_id: &AgentId) -> AgentLifecycleResult<Arc<dyn ManagedAgent>> {
        self.agents()
            .get(agent_id)
            .cloned()
            .ok_or_else(|| AgentLifecycleError::NotRegistered(agent_id.clone()))
    }

    async fn record_hook_failure(
        &self,
        mut record: AgentRecord,
        hook: AgentHook,
        failure: AgentHookError,
    ) -> AgentLifecycleError {
        let entry = AgentErrorEntry::new(
            failure.to_string(),
            self.clock.utc(),
            render_source_chain(&failure),
        );
        let error_count = record.record_error(entry);
        error!(
            agent_id = %record.id(),
            hook = %hook,
            error_count,
            error = %failure,
            "agent hook failed"
        );

        if error_count > AGENT_ERROR_THRESHOLD && self.healthy.swap(false, Ordering::SeqCst) {
            warn!(
                agent_id = %record.id(),
                error_count,
                threshold = AGENT_ERROR_THRESHOLD,
                "lifecycle manager marked unhealthy"
            );
        }

        if let Err(err) = self.repository.update(&record).await {
            return err.into();
        }

        AgentLifecycleError::HookFailure {
            agent_id: record.id().clone(),
            hook,
            source: failure,
        }
    }

    fn agents(&self) -> RwLockReadGuard<'_, HashMap<AgentId, Arc<dyn ManagedAgent>>> {
        self.agents.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn agents_mut(&self) -> RwLockWriteGuard<'_, HashMap<AgentId, Arc<dyn ManagedAgent>>> {
        self.agents.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Joins the `Display` of every error below `err` in its source chain.
fn render_source_chain(err: &dyn std::error::Error) -> Option<String> {
    let mut levels = Vec::new();
    let mut current = err.source();
    while let Some(cause) = current {
        levels.push(cause.to_string());
        current = cause.source();
    }
    (!levels.is_empty()).then(|| levels.join(": "))
}
