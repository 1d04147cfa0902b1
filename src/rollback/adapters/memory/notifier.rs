//! Notifier that keeps notifications in memory.

use super::lock_error;
use crate::rollback::{
    domain::{DeploymentId, RecoveryAttempt, RollbackOutcome},
    ports::{RollbackNotifier, RollbackPortResult},
};
use async_trait::async_trait;
use std::sync::{Arc, RwLock};

/// A recorded failure notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedFailureNotice {
    /// Deployment that failed to roll back.
    pub deployment_id: DeploymentId,
    /// Rollback failure message.
    pub error: String,
    /// Recovery attempts reported with the failure.
    pub attempts: Vec<RecoveryAttempt>,
}

#[derive(Debug, Default)]
struct NotifierState {
    completed: Vec<RollbackOutcome>,
    failures: Vec<RecordedFailureNotice>,
}

/// Notifier recording every notification and reporting fixed channels.
#[derive(Debug, Clone)]
pub struct RecordingNotifier {
    channels: Vec<String>,
    state: Arc<RwLock<NotifierState>>,
}

impl Default for RecordingNotifier {
    fn default() -> Self {
        Self::new(["log"])
    }
}

impl RecordingNotifier {
    /// Creates a notifier reporting the given channels as notified.
    #[must_use]
    pub fn new<I, S>(channels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            channels: channels.into_iter().map(Into::into).collect(),
            state: Arc::new(RwLock::new(NotifierState::default())),
        }
    }

    /// Returns outcomes announced as completed.
    ///
    /// # Errors
    ///
    /// Returns an error when the notifier lock is poisoned.
    pub fn completed(&self) -> RollbackPortResult<Vec<RollbackOutcome>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.completed.clone())
    }

    /// Returns failure notifications.
    ///
    /// # Errors
    ///
    /// Returns an error when the notifier lock is poisoned.
    pub fn failures(&self) -> RollbackPortResult<Vec<RecordedFailureNotice>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.failures.clone())
    }
}

#[async_trait]
impl RollbackNotifier for RecordingNotifier {
    async fn send_rollback_notification(
        &self,
        _deployment_id: &DeploymentId,
        outcome: &RollbackOutcome,
    ) -> RollbackPortResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.completed.push(outcome.clone());
        Ok(())
    }

    async fn send_rollback_failure_notification(
        &self,
        deployment_id: &DeploymentId,
        error: &str,
        attempts: &[RecoveryAttempt],
    ) -> RollbackPortResult<Vec<String>> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.failures.push(RecordedFailureNotice {
            deployment_id: deployment_id.clone(),
            error: error.to_owned(),
            attempts: attempts.to_vec(),
        });
        Ok(self.channels.clone())
    }
}
