//! In-memory repository for agent records.

use crate::agent::{
    domain::{AgentId, AgentRecord},
    ports::{AgentRecordRepository, AgentRecordRepositoryError, AgentRecordRepositoryResult},
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Thread-safe in-memory agent record repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAgentRecordRepository {
    state: Arc<RwLock<HashMap<AgentId, AgentRecord>>>,
}

impl InMemoryAgentRecordRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl std::fmt::Display) -> AgentRecordRepositoryError {
    AgentRecordRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl AgentRecordRepository for InMemoryAgentRecordRepository {
    async fn insert(&self, record: &AgentRecord) -> AgentRecordRepositoryResult<()> {
        let mut records = self.state.write().map_err(lock_error)?;
        if records.contains_key(record.id()) {
            return Err(AgentRecordRepositoryError::Duplicate(record.id().clone()));
        }
        records.insert(record.id().clone(), record.clone());
        Ok(())
    }

    async fn update(&self, record: &AgentRecord) -> AgentRecordRepositoryResult<()> {
        let mut records = self.state.write().map_err(lock_error)?;
        let stored = records
            .get_mut(record.id())
            .ok_or_else(|| AgentRecordRepositoryError::NotFound(record.id().clone()))?;
        *stored = record.clone();
        Ok(())
    }

    async fn find(&self, agent_id: &AgentId) -> AgentRecordRepositoryResult<Option<AgentRecord>> {
        let records = self.state.read().map_err(lock_error)?;
        Ok(records.get(agent_id).cloned())
    }

    async fn remove(&self, agent_id: &AgentId) -> AgentRecordRepositoryResult<AgentRecord> {
        let mut records = self.state.write().map_err(lock_error)?;
        records
            .remove(agent_id)
            .ok_or_else(|| AgentRecordRepositoryError::NotFound(agent_id.clone()))
    }

    async fn list_all(&self) -> AgentRecordRepositoryResult<Vec<AgentRecord>> {
        let records = self.state.read().map_err(lock_error)?;
        Ok(records.values().cloned().collect())
    }

    async fn clear(&self) -> AgentRecordRepositoryResult<()> {
        let mut records = self.state.write().map_err(lock_error)?;
        records.clear();
        Ok(())
    }
}
