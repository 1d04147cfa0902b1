//! Service and agent health monitoring.
//!
//! Probes services and agents through optional capabilities, aggregates the
//! results with tracked metric thresholds into a [`domain::SystemHealthSnapshot`],
//! and polls self-reporting agents on demand.

pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
