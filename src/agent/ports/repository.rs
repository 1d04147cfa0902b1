//! Repository port for agent record storage.

use crate::agent::domain::{AgentId, AgentRecord};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for agent record repository operations.
pub type AgentRecordRepositoryResult<T> = Result<T, AgentRecordRepositoryError>;

/// Storage contract for agent supervision records.
///
/// The in-memory adapter scopes records to one process. A shared store can
/// implement the same contract when records must outlive it.
#[async_trait]
pub trait AgentRecordRepository: Send + Sync {
    /// Stores a new record.
    ///
    /// # Errors
    ///
    /// Returns [`AgentRecordRepositoryError::Duplicate`] when a record with
    /// the same identifier already exists.
    async fn insert(&self, record: &AgentRecord) -> AgentRecordRepositoryResult<()>;

    /// Replaces an existing record.
    ///
    /// # Errors
    ///
    /// Returns [`AgentRecordRepositoryError::NotFound`] when the record does
    /// not exist.
    async fn update(&self, record: &AgentRecord) -> AgentRecordRepositoryResult<()>;

    /// Finds a record by identifier.
    async fn find(&self, agent_id: &AgentId) -> AgentRecordRepositoryResult<Option<AgentRecord>>;

    /// Removes and returns a record.
    ///
    /// # Errors
    ///
    /// Returns [`AgentRecordRepositoryError::NotFound`] when the record does
    /// not exist.
    async fn remove(&self, agent_id: &AgentId) -> AgentRecordRepositoryResult<AgentRecord>;

    /// Returns every stored record.
    async fn list_all(&self) -> AgentRecordRepositoryResult<Vec<AgentRecord>>;

    /// Removes every stored record.
    async fn clear(&self) -> AgentRecordRepositoryResult<()>;
}

/// Errors returned by agent record repository implementations.
#[derive(Debug, Clone, Error)]
pub enum AgentRecordRepositoryError {
    /// A record with the same identifier already exists.
    #[error("duplicate agent record: {0}")]
    Duplicate(AgentId),

    /// The record was not found.
    #[error("agent record not found: {0}")]
    NotFound(AgentId),

    /// Storage-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl AgentRecordRepositoryError {
    /// Wraps a storage-layer failure.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
