//! In-memory backup store.

use super::lock_error;
use crate::rollback::{
    domain::BackupDescriptor,
    ports::{BackupProvider, RollbackPortResult},
};
use async_trait::async_trait;
use mockable::Clock;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// Backup provider that records descriptors without copying data.
#[derive(Clone)]
pub struct InMemoryBackupStore<C>
where
    C: Clock + Send + Sync,
{
    clock: Arc<C>,
    backups: Arc<RwLock<Vec<BackupDescriptor>>>,
}

impl<C> InMemoryBackupStore<C>
where
    C: Clock + Send + Sync,
{
    /// Creates an empty store.
    #[must_use]
    pub fn new(clock: Arc<C>) -> Self {
        Self {
            clock,
            backups: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Returns every backup taken, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error when the store lock is poisoned.
    pub fn backups(&self) -> RollbackPortResult<Vec<BackupDescriptor>> {
        let backups = self.backups.read().map_err(lock_error)?;
        Ok(backups.clone())
    }
}

#[async_trait]
impl<C> BackupProvider for InMemoryBackupStore<C>
where
    C: Clock + Send + Sync,
{
    async fn create_backup(&self, label: &str) -> RollbackPortResult<BackupDescriptor> {
        let descriptor = BackupDescriptor {
            id: Uuid::new_v4().to_string(),
            label: label.to_owned(),
            created_at: self.clock.utc(),
        };
        let mut backups = self.backups.write().map_err(lock_error)?;
        backups.push(descriptor.clone());
        Ok(descriptor)
    }
}
