//! Port contracts for agent lifecycle supervision.

mod capabilities;
mod repository;

pub use capabilities::{
    AgentHookError, AgentHookResult, Configurable, ManagedAgent, Startable, Stoppable,
};
pub use repository::{
    AgentRecordRepository, AgentRecordRepositoryError, AgentRecordRepositoryResult,
};
