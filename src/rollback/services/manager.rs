//! Service layer for deployment rollback.

use crate::rollback::{
    domain::{
        AuditEntry, AuditStatus, CleanupReport, CleanupTarget, DeploymentId, FailureHandling,
        IntegrityReport, IntegrityScope, RecoveryAttempt, RecoveryStatus, RollbackOutcome,
        RollbackPhase, RollbackStep, StepRecord,
    },
    ports::{
        AuditSink, BackupProvider, DeploymentReverter, HealthVerifier, IntegrityInspector,
        RecoveryStrategy, RollbackNotifier, RollbackPortError, WorkspaceCleaner,
    },
};
use crate::settings::RollbackSettings;
use mockable::Clock;
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Reason written to the audit log for a completed rollback.
const ROLLBACK_REASON: &str = "deployment rollback";

/// Label used for a recovery attempt whose action failed before naming itself.
const FAILED_RECOVERY_ACTION: &str = "recovery_action";

/// Why the rollback pipeline stopped.
#[derive(Debug, Error)]
pub enum RollbackError {
    /// A collaborator failed while running a step.
    #[error("{step} step failed: {source}")]
    StepFailed {
        /// Step that failed.
        step: RollbackStep,
        /// Error raised by the collaborator.
        source: RollbackPortError,
    },

    /// Post-rollback verification found the system unhealthy.
    #[error("health verification failed after rollback")]
    Unhealthy,
}

impl RollbackError {
    fn step(step: RollbackStep) -> impl FnOnce(RollbackPortError) -> Self {
        move |source| Self::StepFailed { step, source }
    }
}

/// Collaborators used by the rollback manager.
#[derive(Clone)]
pub struct RollbackPorts {
    /// Takes the pre-rollback backup.
    pub backups: Arc<dyn BackupProvider>,
    /// Reverts each enabled phase.
    pub reverter: Arc<dyn DeploymentReverter>,
    /// Verifies health after the rollback and after each recovery action.
    pub health: Arc<dyn HealthVerifier>,
    /// Runs recovery actions after a failed rollback.
    pub recovery: Arc<dyn RecoveryStrategy>,
    /// Records every rollback.
    pub audit: Arc<dyn AuditSink>,
    /// Announces rollback results.
    pub notifier: Arc<dyn RollbackNotifier>,
    /// Inspects data integrity on request.
    pub integrity: Arc<dyn IntegrityInspector>,
    /// Cleans up after a rollback on request.
    pub cleaner: Arc<dyn WorkspaceCleaner>,
}

/// Deployment rollback orchestrator.
///
/// Each call to [`RollbackManager::execute_rollback`] runs the pipeline
/// `backup → database → files → configuration → dependencies → health_check`
/// and returns a [`RollbackOutcome`] instead of an error. Concurrent calls
/// for the same deployment are not serialized.
pub struct RollbackManager<C>
where
    C: Clock + Send + Sync,
{
    ports: RollbackPorts,
    settings: RollbackSettings,
    clock: Arc<C>,
    cancel_token: CancellationToken,
}

impl<C> RollbackManager<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a rollback manager.
    #[must_use]
    pub fn new(ports: RollbackPorts, settings: RollbackSettings, clock: Arc<C>) -> Self {
        Self {
            ports,
            settings,
            clock,
            cancel_token: CancellationToken::new(),
        }
    }

    /// Replaces the token that interrupts recovery delays.
    #[must_use]
    pub fn with_cancellation_token(mut self, token: CancellationToken) -> Self {
        self.cancel_token = token;
        self
    }

    /// Returns a handle that interrupts recovery delays when cancelled.
    ///
    /// Cancellation is terminal for this manager. A cancelled token cannot be
    /// reset, so every later recovery run makes a single attempt and skips
    /// the retry delay. Build a new manager with
    /// [`RollbackManager::with_cancellation_token`] to recover with delays
    /// again.
    #[must_use]
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    /// Returns the active settings.
    #[must_use]
    pub const fn settings(&self) -> &RollbackSettings {
        &self.settings
    }

    /// Rolls back a deployment.
    ///
    /// On the first failing step the pipeline stops, the failure is handled
    /// once through [`RollbackManager::handle_failed_rollback`], and the
    /// outcome lists only the steps completed before the failure.
    pub async fn execute_rollback(&self, deployment_id: &DeploymentId) -> RollbackOutcome {
        let started = Instant::now();
        info!(deployment_id = %deployment_id, "starting rollback");

        let mut steps = Vec::new();
        let result = self.run_pipeline(deployment_id, &mut steps).await;
        let mut outcome = RollbackOutcome {
            deployment_id: deployment_id.clone(),
            steps,
            success: result.is_ok(),
            error: None,
            timestamp: self.clock.utc(),
            duration_ms: 0,
            failure_handling: None,
        };

        match result {
            Ok(()) => {
                outcome.duration_ms = elapsed_millis(started);
                info!(
                    deployment_id = %deployment_id,
                    duration_ms = outcome.duration_ms,
                    "rollback completed"
                );
                self.report_success(&outcome).await;
            }
            Err(err) => {
                let message = err.to_string();
                error!(deployment_id = %deployment_id, error = %message, "rollback failed");
                outcome.failure_handling =
                    Some(self.handle_failed_rollback(deployment_id, &message).await);
                self.audit(
                    deployment_id,
                    AuditEntry {
                        reason: message.clone(),
                        steps: outcome.steps.clone(),
                        status: AuditStatus::Failed,
                    },
                )
                .await;
                outcome.error = Some(message);
                outcome.duration_ms = elapsed_millis(started);
            }
        }
        outcome
    }

    /// Runs the recovery loop for a failed rollback and sends the failure
    /// notification.
    ///
    /// Recovery runs at most `max_attempts` times and stops at the first
    /// attempt verified healthy. A notification failure is reported as
    /// `handled: false`.
    pub async fn handle_failed_rollback(
        &self,
        deployment_id: &DeploymentId,
        error: &str,
    ) -> FailureHandling {
        let recovery_actions = if self.settings.recovery.enabled {
            self.run_recovery(deployment_id).await
        } else {
            debug!(deployment_id = %deployment_id, "recovery disabled");
            Vec::new()
        };
        let recovered = recovery_actions
            .iter()
            .any(|attempt| attempt.status == RecoveryStatus::Recovered);

        match self
            .ports
            .notifier
            .send_rollback_failure_notification(deployment_id, error, &recovery_actions)
            .await
        {
            Ok(notifications_sent) => FailureHandling {
                handled: true,
                recovered,
                recovery_actions,
                notifications_sent,
                error: None,
            },
            Err(err) => {
                error!(
                    deployment_id = %deployment_id,
                    error = %err,
                    "failed to handle rollback failure"
                );
                FailureHandling {
                    handled: false,
                    recovered,
                    recovery_actions,
                    notifications_sent: Vec::new(),
                    error: Some(err.to_string()),
                }
            }
        }
    }

    /// Inspects each integrity scope in turn.
    ///
    /// Inspection stops at the first scope that errors or is found broken;
    /// findings gathered so far are kept.
    pub async fn verify_data_integrity(&self, deployment_id: &DeploymentId) -> IntegrityReport {
        let mut findings = BTreeMap::new();
        let mut error = None;
        for scope in IntegrityScope::ALL {
            match self.ports.integrity.inspect(deployment_id, scope).await {
                Ok(finding) => {
                    let valid = finding.valid;
                    findings.insert(scope, finding);
                    if !valid {
                        error = Some(format!("{scope} integrity check failed"));
                        break;
                    }
                }
                Err(err) => {
                    error = Some(format!("{scope} inspection failed: {err}"));
                    break;
                }
            }
        }
        if let Some(message) = &error {
            warn!(deployment_id = %deployment_id, error = %message, "integrity verification failed");
        }

        IntegrityReport {
            deployment_id: deployment_id.clone(),
            success: error.is_none(),
            findings,
            error,
            timestamp: self.clock.utc(),
        }
    }

    /// Cleans each workspace target in turn.
    ///
    /// Cleanup stops at the first failing target; counts gathered so far are
    /// kept.
    pub async fn cleanup_after_rollback(&self, deployment_id: &DeploymentId) -> CleanupReport {
        let mut removed = BTreeMap::new();
        let mut error = None;
        for target in CleanupTarget::ALL {
            match self.ports.cleaner.clean(deployment_id, target).await {
                Ok(count) => {
                    removed.insert(target, count);
                }
                Err(err) => {
                    warn!(
                        deployment_id = %deployment_id,
                        target = %target,
                        error = %err,
                        "cleanup failed"
                    );
                    error = Some(format!("{target} cleanup failed: {err}"));
                    break;
                }
            }
        }

        CleanupReport {
            deployment_id: deployment_id.clone(),
            success: error.is_none(),
            removed,
            error,
            timestamp: self.clock.utc(),
        }
    }

    async fn run_pipeline(
        &self,
        deployment_id: &DeploymentId,
        steps: &mut Vec<StepRecord>,
    ) -> Result<(), RollbackError> {
        let backup = self
            .ports
            .backups
            .create_backup(&deployment_id.backup_label())
            .await
            .map_err(RollbackError::step(RollbackStep::Backup))?;
        let backup_data = serde_json::to_value(&backup)
            .inspect_err(|err| {
                debug!(
                    deployment_id = %deployment_id,
                    error = %err,
                    "backup descriptor could not be serialized"
                );
            })
            .ok();
        steps.push(StepRecord::succeeded(RollbackStep::Backup, backup_data));

        for phase in RollbackPhase::ALL {
            steps.push(self.run_phase(deployment_id, phase).await?);
        }

        let healthy = self
            .ports
            .health
            .check_health()
            .await
            .map_err(RollbackError::step(RollbackStep::HealthCheck))?;
        if !healthy {
            return Err(RollbackError::Unhealthy);
        }
        steps.push(StepRecord::succeeded(
            RollbackStep::HealthCheck,
            Some(json!({ "healthy": true })),
        ));
        Ok(())
    }

    async fn run_phase(
        &self,
        deployment_id: &DeploymentId,
        phase: RollbackPhase,
    ) -> Result<StepRecord, RollbackError> {
        let step = RollbackStep::from(phase);
        if !self.settings.is_enabled(phase) {
            debug!(deployment_id = %deployment_id, %phase, "rollback phase disabled");
            return Ok(StepRecord::skipped(step));
        }
        let data = self
            .ports
            .reverter
            .revert(deployment_id, phase)
            .await
            .map_err(RollbackError::step(step))?;
        debug!(deployment_id = %deployment_id, %phase, "rollback phase reverted");
        Ok(StepRecord::succeeded(step, Some(data)))
    }

    async fn report_success(&self, outcome: &RollbackOutcome) {
        let deployment_id = &outcome.deployment_id;
        self.audit(
            deployment_id,
            AuditEntry {
                reason: ROLLBACK_REASON.to_owned(),
                steps: outcome.steps.clone(),
                status: AuditStatus::Success,
            },
        )
        .await;
        if let Err(err) = self
            .ports
            .notifier
            .send_rollback_notification(deployment_id, outcome)
            .await
        {
            warn!(
                deployment_id = %deployment_id,
                error = %err,
                "failed to send rollback notification"
            );
        }
    }

    async fn audit(&self, deployment_id: &DeploymentId, entry: AuditEntry) {
        if let Err(err) = self.ports.audit.log_rollback(deployment_id, &entry).await {
            warn!(
                deployment_id = %deployment_id,
                error = %err,
                "failed to write rollback audit entry"
            );
        }
    }

    async fn run_recovery(&self, deployment_id: &DeploymentId) -> Vec<RecoveryAttempt> {
        let max_attempts = self.settings.recovery.max_attempts;
        let mut attempts = Vec::new();
        for attempt in 1..=max_attempts {
            let record = self.attempt_recovery(deployment_id, attempt).await;
            let recovered = record.status == RecoveryStatus::Recovered;
            attempts.push(record);
            if recovered {
                info!(deployment_id = %deployment_id, attempt, "recovery verified");
                break;
            }
            if attempt < max_attempts && !self.wait_before_retry().await {
                warn!(deployment_id = %deployment_id, attempt, "recovery cancelled");
                break;
            }
        }
        attempts
    }

    async fn attempt_recovery(&self, deployment_id: &DeploymentId, attempt: u32) -> RecoveryAttempt {
        let (action, status, detail) =
            match self.ports.recovery.attempt_recovery(deployment_id, attempt).await {
                Err(err) => {
                    warn!(deployment_id = %deployment_id, attempt, error = %err, "recovery action failed");
                    (
                        FAILED_RECOVERY_ACTION.to_owned(),
                        RecoveryStatus::Failed,
                        Some(err.to_string()),
                    )
                }
                Ok(action) => match self.ports.health.check_health().await {
                    Ok(true) => (action, RecoveryStatus::Recovered, None),
                    Ok(false) => (
                        action,
                        RecoveryStatus::Unverified,
                        Some("system still unhealthy".to_owned()),
                    ),
                    Err(err) => (action, RecoveryStatus::Unverified, Some(err.to_string())),
                },
            };
        RecoveryAttempt {
            attempt,
            timestamp: self.clock.utc(),
            action,
            status,
            detail,
        }
    }

    /// Returns `false` when the delay was cancelled.
    async fn wait_before_retry(&self) -> bool {
        tokio::select! {
            () = self.cancel_token.cancelled() => false,
            () = tokio::time::sleep(self.settings.recovery.retry_interval()) => true,
        }
    }
}

fn elapsed_millis(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
