//! Adapter implementations for agent supervision ports.

pub mod memory;
