//! Warden: supervision core for managed agents and deployments.
//!
//! This crate tracks managed runtime units ("agents") through their
//! lifecycle, aggregates service and agent health into a system-wide
//! verdict, and orchestrates multi-step rollback of a failed deployment with
//! bounded recovery retries.
//!
//! # Architecture
//!
//! Warden follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (in-memory, tracing)
//!
//! # Modules
//!
//! - [`agent`]: Agent registry and lifecycle supervision
//! - [`health`]: Service and agent health monitoring
//! - [`rollback`]: Deployment rollback with bounded recovery
//! - [`settings`]: Supervisor configuration

pub mod agent;
pub mod health;
pub mod rollback;
pub mod settings;

/// JSON object map used for agent configuration, metrics and probe details.
pub type AttributeMap = serde_json::Map<String, serde_json::Value>;
