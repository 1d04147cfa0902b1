//! Application services for agent lifecycle supervision.

mod lifecycle;

pub use lifecycle::{
    AGENT_ERROR_THRESHOLD, AgentHook, AgentLifecycleError, AgentLifecycleResult,
    AgentLifecycleService, ShutdownReport,
};
