//! Unit tests for deployment rollback.

mod support;
