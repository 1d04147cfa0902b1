//! Errors raised by rollback collaborators.

use std::sync::Arc;
use thiserror::Error;

/// Result type for rollback collaborator calls.
pub type RollbackPortResult<T> = Result<T, RollbackPortError>;

/// Errors raised by rollback collaborators.
#[derive(Debug, Clone, Error)]
pub enum RollbackPortError {
    /// The collaborator refused the request with a message.
    #[error("{0}")]
    Rejected(String),

    /// The collaborator failed with an underlying error.
    #[error("rollback collaborator failed: {0}")]
    Runtime(Arc<dyn std::error::Error + Send + Sync>),
}

impl RollbackPortError {
    /// Creates a rejection with a message.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected(message.into())
    }

    /// Wraps a runtime error raised by the collaborator.
    pub fn runtime(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Runtime(Arc::new(err))
    }
}
