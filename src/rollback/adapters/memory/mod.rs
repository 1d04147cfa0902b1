//! In-memory rollback collaborators for tests and local runs.

mod audit;
mod backup;
mod notifier;

pub use audit::RecordingAuditSink;
pub use backup::InMemoryBackupStore;
pub use notifier::{RecordedFailureNotice, RecordingNotifier};

use crate::rollback::ports::RollbackPortError;

fn lock_error(err: impl std::fmt::Display) -> RollbackPortError {
    RollbackPortError::runtime(std::io::Error::other(err.to_string()))
}
