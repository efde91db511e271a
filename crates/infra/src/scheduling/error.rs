//! Scheduler error types

use haven_domain::HavenError;
use thiserror::Error;

/// Scheduler-specific errors
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Scheduler is already running
    #[error("scheduler already running")]
    AlreadyRunning,

    /// Scheduler is not running
    #[error("scheduler not running")]
    NotRunning,

    /// Background task panicked or was aborted
    #[error("scheduler task join failed: {0}")]
    TaskJoinFailed(String),

    /// Operation timed out
    #[error("scheduler operation timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// The underlying purge run failed
    #[error("purge run failed: {0}")]
    RunFailed(#[from] HavenError),
}

impl From<SchedulerError> for HavenError {
    fn from(err: SchedulerError) -> Self {
        match err {
            SchedulerError::AlreadyRunning | SchedulerError::NotRunning => {
                HavenError::Conflict(err.to_string())
            }
            SchedulerError::RunFailed(inner) => inner,
            SchedulerError::TaskJoinFailed(_) | SchedulerError::Timeout { .. } => {
                HavenError::Internal(err.to_string())
            }
        }
    }
}

/// Convenience type alias for scheduler operations
pub type SchedulerResult<T> = Result<T, SchedulerError>;
