//! Domain model for agent supervision.
//!
//! The agent domain models agent identity, lifecycle state, configuration,
//! metrics, error history and the category-scoped instance registry. Live
//! agent instances and persistence stay outside this boundary.

mod error;
mod ids;
mod metrics;
mod record;
mod registry;
mod state;

pub use error::{AgentDomainError, ParseAgentLifecycleStateError, ParseRegistryStatusError};
pub use ids::AgentId;
pub use metrics::AgentMetrics;
pub use record::{AgentErrorEntry, AgentRecord, AgentSummary};
pub use registry::{AgentRegistry, RegistryEntry, RegistryStatus};
pub use state::AgentLifecycleState;
