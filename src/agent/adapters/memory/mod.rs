//! In-memory adapters for agent supervision.

mod repository;

pub use repository::InMemoryAgentRecordRepository;
