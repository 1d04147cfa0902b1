//! Scripted collaborators shared by rollback tests.

use crate::rollback::{
    adapters::memory::{InMemoryBackupStore, RecordingAuditSink, RecordingNotifier},
    domain::{
        BackupDescriptor, CleanupTarget, DeploymentId, IntegrityFinding, IntegrityScope,
        RollbackPhase,
    },
    ports::{
        AuditSink, BackupProvider, DeploymentReverter, HealthVerifier, IntegrityInspector,
        RecoveryStrategy, RollbackNotifier, RollbackPortError, RollbackPortResult,
        WorkspaceCleaner,
    },
    services::{RollbackManager, RollbackPorts},
};
use crate::settings::RollbackSettings;
use async_trait::async_trait;
use mockable::DefaultClock;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

pub fn deployment() -> DeploymentId {
    DeploymentId::new("deploy-42").expect("valid deployment id")
}

/// Reverter that records phases and fails on one of them.
#[derive(Default)]
pub struct ScriptedReverter {
    pub failing: Option<RollbackPhase>,
    pub calls: Mutex<Vec<RollbackPhase>>,
}

impl ScriptedReverter {
    pub fn failing_at(phase: RollbackPhase) -> Self {
        Self {
            failing: Some(phase),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<RollbackPhase> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl DeploymentReverter for ScriptedReverter {
    async fn revert(
        &self,
        _deployment_id: &DeploymentId,
        phase: RollbackPhase,
    ) -> RollbackPortResult<serde_json::Value> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(phase);
        if self.failing == Some(phase) {
            return Err(RollbackPortError::rejected(format!("{phase} revert refused")));
        }
        Ok(json!({ "reverted": phase.as_str() }))
    }
}

/// Health verifier returning queued verdicts, then a fallback.
pub struct ScriptedHealth {
    verdicts: Mutex<VecDeque<bool>>,
    fallback: bool,
    pub calls: AtomicU32,
}

impl ScriptedHealth {
    pub fn always(healthy: bool) -> Self {
        Self::sequence([], healthy)
    }

    pub fn sequence(verdicts: impl IntoIterator<Item = bool>, fallback: bool) -> Self {
        Self {
            verdicts: Mutex::new(verdicts.into_iter().collect()),
            fallback,
            calls: AtomicU32::new(0),
        }
    }
}

#[async_trait]
impl HealthVerifier for ScriptedHealth {
    async fn check_health(&self) -> RollbackPortResult<bool> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self
            .verdicts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        Ok(next.unwrap_or(self.fallback))
    }
}

/// Recovery strategy counting attempts, optionally failing each one.
#[derive(Default)]
pub struct ScriptedRecovery {
    pub fail: bool,
    pub calls: AtomicU32,
}

#[async_trait]
impl RecoveryStrategy for ScriptedRecovery {
    async fn attempt_recovery(
        &self,
        _deployment_id: &DeploymentId,
        attempt: u32,
    ) -> RollbackPortResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(RollbackPortError::rejected("restart refused"));
        }
        Ok(format!("restart_services#{attempt}"))
    }
}

/// Backup provider that always fails.
pub struct FailingBackup;

#[async_trait]
impl BackupProvider for FailingBackup {
    async fn create_backup(&self, _label: &str) -> RollbackPortResult<BackupDescriptor> {
        Err(RollbackPortError::rejected("disk full"))
    }
}

/// Integrity inspector with one erroring and one broken scope.
#[derive(Default)]
pub struct StubInspector {
    pub erroring: Option<IntegrityScope>,
    pub broken: Option<IntegrityScope>,
}

#[async_trait]
impl IntegrityInspector for StubInspector {
    async fn inspect(
        &self,
        _deployment_id: &DeploymentId,
        scope: IntegrityScope,
    ) -> RollbackPortResult<IntegrityFinding> {
        if self.erroring == Some(scope) {
            return Err(RollbackPortError::rejected("checksum unavailable"));
        }
        if self.broken == Some(scope) {
            return Ok(IntegrityFinding::invalid());
        }
        Ok(IntegrityFinding::valid())
    }
}

/// Cleaner removing three items per target, failing on one target.
#[derive(Default)]
pub struct StubCleaner {
    pub failing: Option<CleanupTarget>,
}

#[async_trait]
impl WorkspaceCleaner for StubCleaner {
    async fn clean(
        &self,
        _deployment_id: &DeploymentId,
        target: CleanupTarget,
    ) -> RollbackPortResult<u64> {
        if self.failing == Some(target) {
            return Err(RollbackPortError::rejected("permission denied"));
        }
        Ok(3)
    }
}

/// Collaborators wired into a rollback manager under test.
pub struct Harness {
    pub backups: Arc<InMemoryBackupStore<DefaultClock>>,
    pub reverter: Arc<ScriptedReverter>,
    pub health: Arc<ScriptedHealth>,
    pub recovery: Arc<ScriptedRecovery>,
    pub audit: Arc<RecordingAuditSink>,
    pub notifier: Arc<RecordingNotifier>,
    pub inspector: Arc<StubInspector>,
    pub cleaner: Arc<StubCleaner>,
}

impl Harness {
    pub fn new(reverter: ScriptedReverter, health: ScriptedHealth) -> Self {
        Self {
            backups: Arc::new(InMemoryBackupStore::new(Arc::new(DefaultClock))),
            reverter: Arc::new(reverter),
            health: Arc::new(health),
            recovery: Arc::new(ScriptedRecovery::default()),
            audit: Arc::new(RecordingAuditSink::new()),
            notifier: Arc::new(RecordingNotifier::new(["email", "slack"])),
            inspector: Arc::new(StubInspector::default()),
            cleaner: Arc::new(StubCleaner::default()),
        }
    }

    pub fn healthy() -> Self {
        Self::new(ScriptedReverter::default(), ScriptedHealth::always(true))
    }

    pub fn ports(&self) -> RollbackPorts {
        self.ports_with(self.audit.clone(), self.notifier.clone())
    }

    pub fn ports_with(
        &self,
        audit: Arc<dyn AuditSink>,
        notifier: Arc<dyn RollbackNotifier>,
    ) -> RollbackPorts {
        RollbackPorts {
            backups: self.backups.clone(),
            reverter: self.reverter.clone(),
            health: self.health.clone(),
            recovery: self.recovery.clone(),
            audit,
            notifier,
            integrity: self.inspector.clone(),
            cleaner: self.cleaner.clone(),
        }
    }

    pub fn manager(&self, settings: RollbackSettings) -> RollbackManager<DefaultClock> {
        RollbackManager::new(self.ports(), settings, Arc::new(DefaultClock))
    }
}
