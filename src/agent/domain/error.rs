//! Error types for agent domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing or mutating agent domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AgentDomainError {
    /// The agent identifier is empty after trimming.
    #[error("agent identifier must not be empty")]
    EmptyAgentId,

    /// A registry category is empty after trimming.
    #[error("agent registry category must not be empty")]
    EmptyCategory,

    /// A registry entry name is empty after trimming.
    #[error("agent registry name must not be empty")]
    EmptyRegistryName,

    /// The registry already holds an instance under the same category and name.
    #[error("agent registry already contains '{category}/{name}'")]
    DuplicateRegistryEntry {
        /// Registry category.
        category: String,
        /// Entry name within the category.
        name: String,
    },
}

/// Error returned while parsing an agent lifecycle state.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown agent lifecycle state: {0}")]
pub struct ParseAgentLifecycleStateError(pub String);

/// Error returned while parsing an agent registry status.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown agent registry status: {0}")]
pub struct ParseRegistryStatusError(pub String);
