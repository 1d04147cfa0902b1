//! Port contracts for health probing.

mod probe;
mod reporter;

pub use probe::{
    HealthCheckable, MetricsProvider, ProbeError, ProbeResult, ProbeTarget, RunningProbe,
};
pub use reporter::AgentHealthReporter;
