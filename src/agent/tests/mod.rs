//! Unit tests for agent supervision.

mod support;
