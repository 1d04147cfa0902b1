//! Unit tests for health monitoring.

mod support;
