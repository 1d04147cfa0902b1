//! Error types for health domain parsing.

use thiserror::Error;

/// Error returned while parsing a health status.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown health status: {0}")]
pub struct ParseHealthStatusError(pub String);

/// Error returned while parsing a tracked metric name.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown tracked metric: {0}")]
pub struct ParseTrackedMetricError(pub String);
