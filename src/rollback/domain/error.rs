//! Error types for rollback domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing rollback domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RollbackDomainError {
    /// The deployment identifier is empty after trimming.
    #[error("deployment identifier must not be empty")]
    EmptyDeploymentId,
}

/// Error returned while parsing a rollback step name.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown rollback step: {0}")]
pub struct ParseRollbackStepError(pub String);
