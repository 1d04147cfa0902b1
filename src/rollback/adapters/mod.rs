//! Adapter implementations of rollback ports.

mod health;
pub mod memory;
mod tracing_audit;

pub use tracing_audit::{AUDIT_TARGET, TracingAuditSink};
