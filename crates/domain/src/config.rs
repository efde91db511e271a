//! Configuration structures
//!
//! Typed configuration for the lifecycle core. Values are loaded by the
//! infrastructure layer (environment variables or config file) and injected
//! at startup; nothing here reads process-wide state at call time.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_DB_POOL_SIZE, DEFAULT_GRACE_PERIOD_DAYS, DEFAULT_PURGE_INTERVAL_SECS};

/// Top-level application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub lifecycle: LifecycleConfig,
    #[serde(default)]
    pub access: AccessConfig,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database file path
    pub path: String,
    /// Connection pool size
    pub pool_size: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { path: "haven.db".into(), pool_size: DEFAULT_DB_POOL_SIZE }
    }
}

/// Deletion lifecycle configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifecycleConfig {
    /// Grace period between a deletion request and the irreversible purge
    pub grace_period_days: u32,
    /// Interval between scheduled purge runs, in seconds
    pub purge_interval_secs: u64,
    /// Whether the periodic purge job is enabled
    pub purge_enabled: bool,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            grace_period_days: DEFAULT_GRACE_PERIOD_DAYS,
            purge_interval_secs: DEFAULT_PURGE_INTERVAL_SECS,
            purge_enabled: true,
        }
    }
}

/// Authorization configuration
///
/// The admin allow-list is fixed at startup and handed to the access policy;
/// there is no mutable global admin state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccessConfig {
    /// Profile ids granted admin privileges
    pub admin_ids: Vec<String>,
}
