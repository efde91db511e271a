//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Deletion lifecycle
pub const DEFAULT_GRACE_PERIOD_DAYS: u32 = 14;
pub const DELETION_TOKEN_BYTES: usize = 32;
pub const SECONDS_PER_DAY: i64 = 86_400;

/// Actor id recorded on audit entries written by the purge job itself.
pub const PURGE_JOB_ACTOR_ID: &str = "system:deletion-job";

// Scheduling
pub const DEFAULT_PURGE_INTERVAL_SECS: u64 = 3_600;

// Database
pub const DEFAULT_DB_POOL_SIZE: u32 = 5;
