//! Rollback flows wired to the in-memory adapters and the health monitor.

use async_trait::async_trait;
use mockable::DefaultClock;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use warden::health::{
    domain::AgentHealthReport,
    ports::{AgentHealthReporter, ProbeResult},
    services::HealthMonitor,
};
use warden::rollback::{
    adapters::{
        TracingAuditSink,
        memory::{InMemoryBackupStore, RecordingAuditSink, RecordingNotifier},
    },
    domain::{
        AuditStatus, CleanupTarget, DeploymentId, IntegrityFinding, IntegrityScope,
        RecoveryStatus, RollbackPhase, RollbackStep,
    },
    ports::{
        DeploymentReverter, IntegrityInspector, RecoveryStrategy, RollbackPortError,
        RollbackPortResult, WorkspaceCleaner,
    },
    services::{RollbackManager, RollbackPorts},
};
use warden::settings::{RecoverySettings, RollbackSettings};

struct Reverter {
    failing: Option<RollbackPhase>,
}

#[async_trait]
impl DeploymentReverter for Reverter {
    async fn revert(
        &self,
        deployment_id: &DeploymentId,
        phase: RollbackPhase,
    ) -> RollbackPortResult<serde_json::Value> {
        if self.failing == Some(phase) {
            return Err(RollbackPortError::rejected(format!(
                "cannot revert {phase} for {deployment_id}"
            )));
        }
        Ok(serde_json::json!({ "phase": phase.as_str() }))
    }
}

#[derive(Default)]
struct CountingRecovery {
    calls: AtomicU32,
}

#[async_trait]
impl RecoveryStrategy for CountingRecovery {
    async fn attempt_recovery(
        &self,
        _deployment_id: &DeploymentId,
        attempt: u32,
    ) -> RollbackPortResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("restart#{attempt}"))
    }
}

struct CleanInspector;

#[async_trait]
impl IntegrityInspector for CleanInspector {
    async fn inspect(
        &self,
        _deployment_id: &DeploymentId,
        _scope: IntegrityScope,
    ) -> RollbackPortResult<IntegrityFinding> {
        Ok(IntegrityFinding::valid())
    }
}

struct CountingCleaner;

#[async_trait]
impl WorkspaceCleaner for CountingCleaner {
    async fn clean(
        &self,
        _deployment_id: &DeploymentId,
        target: CleanupTarget,
    ) -> RollbackPortResult<u64> {
        Ok(match target {
            CleanupTarget::TemporaryFiles => 4,
            CleanupTarget::Caches => 2,
            CleanupTarget::StaleBackups => 1,
        })
    }
}

struct DegradedAgent;

#[async_trait]
impl AgentHealthReporter for DegradedAgent {
    async fn health_status(&self) -> ProbeResult<AgentHealthReport> {
        Ok(AgentHealthReport::unhealthy())
    }
}

struct Fixture {
    monitor: Arc<HealthMonitor<DefaultClock>>,
    backups: Arc<InMemoryBackupStore<DefaultClock>>,
    audit: Arc<RecordingAuditSink>,
    notifier: Arc<RecordingNotifier>,
    recovery: Arc<CountingRecovery>,
    manager: RollbackManager<DefaultClock>,
}

fn fixture(failing: Option<RollbackPhase>, settings: RollbackSettings) -> Fixture {
    let clock = Arc::new(DefaultClock);
    let monitor = Arc::new(HealthMonitor::new(Arc::clone(&clock)));
    let backups = Arc::new(InMemoryBackupStore::new(Arc::clone(&clock)));
    let audit = Arc::new(RecordingAuditSink::new());
    let notifier = Arc::new(RecordingNotifier::new(["pager"]));
    let recovery = Arc::new(CountingRecovery::default());
    let ports = RollbackPorts {
        backups: backups.clone(),
        reverter: Arc::new(Reverter { failing }),
        health: monitor.clone(),
        recovery: recovery.clone(),
        audit: audit.clone(),
        notifier: notifier.clone(),
        integrity: Arc::new(CleanInspector),
        cleaner: Arc::new(CountingCleaner),
    };
    Fixture {
        monitor,
        backups,
        audit,
        notifier,
        recovery,
        manager: RollbackManager::new(ports, settings, clock),
    }
}

fn deployment() -> DeploymentId {
    DeploymentId::new("release-2025.01").expect("valid deployment id")
}

#[tokio::test(flavor = "multi_thread")]
async fn healthy_system_rolls_back_cleanly() {
    let fixture = fixture(None, RollbackSettings::default());

    let outcome = fixture.manager.execute_rollback(&deployment()).await;

    assert!(outcome.success);
    assert_eq!(outcome.steps.len(), 6);
    assert_eq!(
        outcome.steps.last().map(|record| record.step),
        Some(RollbackStep::HealthCheck)
    );
    let backups = fixture.backups.backups().expect("backups readable");
    assert_eq!(
        backups.first().map(|backup| backup.label.clone()),
        Some("pre_rollback_release-2025.01".to_owned())
    );
    assert_eq!(fixture.notifier.completed().expect("readable").len(), 1);
}

#[tokio::test(start_paused = true)]
async fn degraded_agent_exhausts_recovery() {
    let fixture = fixture(Some(RollbackPhase::Dependencies), RollbackSettings::default());
    fixture.monitor.register_agent(Arc::new(DegradedAgent));

    let outcome = fixture.manager.execute_rollback(&deployment()).await;

    assert!(!outcome.success);
    assert_eq!(outcome.steps.len(), 4);
    let handling = outcome.failure_handling.expect("failure should be handled");
    assert!(handling.handled);
    assert!(!handling.recovered);
    assert_eq!(handling.notifications_sent, vec!["pager"]);
    assert_eq!(fixture.recovery.calls.load(Ordering::SeqCst), 3);
    assert!(
        handling
            .recovery_actions
            .iter()
            .all(|attempt| attempt.status == RecoveryStatus::Unverified)
    );

    let failures = fixture.notifier.failures().expect("readable");
    assert_eq!(failures.len(), 1);
    assert!(
        failures
            .iter()
            .all(|notice| notice.attempts.len() == 3 && notice.error.contains("dependencies"))
    );
    let entries = fixture.audit.entries().expect("readable");
    assert!(
        entries
            .iter()
            .all(|(_, entry)| entry.status == AuditStatus::Failed)
    );
}

#[tokio::test(start_paused = true)]
async fn recovery_succeeds_once_agent_is_removed() {
    let settings = RollbackSettings {
        recovery: RecoverySettings {
            max_attempts: 4,
            retry_interval_secs: 1,
            ..RecoverySettings::default()
        },
        ..RollbackSettings::default()
    };
    let fixture = fixture(Some(RollbackPhase::Files), settings);
    let agent = Arc::new(DegradedAgent);
    fixture.monitor.register_agent(Arc::clone(&agent));
    let monitor = Arc::clone(&fixture.monitor);
    let heal = tokio::spawn(async move {
        tokio::time::sleep(std::time::Duration::from_millis(1500)).await;
        monitor.unregister_agent(agent.as_ref());
    });

    let outcome = fixture.manager.execute_rollback(&deployment()).await;
    heal.await.expect("healing task should finish");

    let handling = outcome.failure_handling.expect("failure should be handled");
    assert!(handling.recovered);
    assert_eq!(handling.recovery_actions.len(), 3);
    assert_eq!(fixture.recovery.calls.load(Ordering::SeqCst), 3);
}

#[tokio::test(flavor = "multi_thread")]
async fn maintenance_reports_after_rollback() {
    let fixture = fixture(None, RollbackSettings::default());

    let integrity = fixture.manager.verify_data_integrity(&deployment()).await;
    let cleanup = fixture.manager.cleanup_after_rollback(&deployment()).await;

    assert!(integrity.success);
    assert_eq!(integrity.findings.len(), 3);
    assert!(cleanup.success);
    assert_eq!(cleanup.removed.values().sum::<u64>(), 7);
}

#[tokio::test(flavor = "multi_thread")]
async fn tracing_audit_sink_can_back_the_manager() {
    let clock = Arc::new(DefaultClock);
    let monitor = Arc::new(HealthMonitor::new(Arc::clone(&clock)));
    let ports = RollbackPorts {
        backups: Arc::new(InMemoryBackupStore::new(Arc::clone(&clock))),
        reverter: Arc::new(Reverter { failing: None }),
        health: monitor,
        recovery: Arc::new(CountingRecovery::default()),
        audit: Arc::new(TracingAuditSink::new()),
        notifier: Arc::new(RecordingNotifier::default()),
        integrity: Arc::new(CleanInspector),
        cleaner: Arc::new(CountingCleaner),
    };
    let manager = RollbackManager::new(ports, RollbackSettings::default(), clock);

    assert!(manager.execute_rollback(&deployment()).await.success);
}
