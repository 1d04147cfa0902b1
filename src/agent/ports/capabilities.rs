//! Optional capabilities a managed agent can expose to the lifecycle manager.
//!
//! An agent type implements [`ManagedAgent`] and overrides the accessor for
//! each capability it supports. The lifecycle manager only invokes the hooks
//! an agent opts into.

use crate::AttributeMap;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for agent hook invocations.
pub type AgentHookResult<T> = Result<T, AgentHookError>;

/// Lifecycle hook invoked when an agent starts.
#[async_trait]
pub trait Startable: Send + Sync {
    /// Starts the agent's work.
    async fn start(&self) -> AgentHookResult<()>;
}

/// Lifecycle hook invoked when an agent stops.
#[async_trait]
pub trait Stoppable: Send + Sync {
    /// Stops the agent's work.
    async fn stop(&self) -> AgentHookResult<()>;
}

/// Hook receiving configuration updates.
#[async_trait]
pub trait Configurable: Send + Sync {
    /// Applies a complete configuration map.
    async fn apply_config(&self, config: &AttributeMap) -> AgentHookResult<()>;
}

/// A unit of work supervised by the lifecycle manager.
pub trait ManagedAgent: Send + Sync {
    /// Returns the start hook, if supported.
    fn as_startable(&self) -> Option<&dyn Startable> {
        None
    }

    /// Returns the stop hook, if supported.
    fn as_stoppable(&self) -> Option<&dyn Stoppable> {
        None
    }

    /// Returns the configuration hook, if supported.
    fn as_configurable(&self) -> Option<&dyn Configurable> {
        None
    }
}

/// Errors raised by agent hooks.
#[derive(Debug, Clone, Error)]
pub enum AgentHookError {
    /// The hook rejected the request with a message.
    #[error("{0}")]
    Rejected(String),

    /// The hook failed with an underlying error.
    #[error("agent hook failed: {0}")]
    Runtime(#[source] Arc<dyn std::error::Error + Send + Sync>),
}

impl AgentHookError {
    /// Creates a rejection with a message.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected(message.into())
    }

    /// Wraps a runtime error raised by the hook.
    pub fn runtime(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Runtime(Arc::new(err))
    }
}
