//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `HAVEN_DB_PATH`: Database file path
//! - `HAVEN_DB_POOL_SIZE`: Connection pool size
//! - `HAVEN_GRACE_PERIOD_DAYS`: Grace period before purge, in days
//! - `HAVEN_PURGE_INTERVAL_SECS`: Interval between purge runs in seconds
//! - `HAVEN_PURGE_ENABLED`: Whether the periodic purge job runs (true/false)
//! - `HAVEN_ADMIN_IDS`: Comma-separated admin profile ids (optional)
//!
//! ## File Locations
//! The loader probes `config.{json,toml}` and `haven.{json,toml}` in the
//! working directory, its two parents, and next to the executable.

use std::path::{Path, PathBuf};

use haven_domain::{
    AccessConfig, Config, DatabaseConfig, HavenError, LifecycleConfig, Result,
};

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If any required
/// variables are missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `HavenError::Config` if configuration cannot be loaded from
/// either source.
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration, falling back to the typed defaults when neither the
/// environment nor a config file provides one.
pub fn load_or_default() -> Config {
    match load() {
        Ok(config) => config,
        Err(e) => {
            tracing::debug!(error = ?e, "no configuration source found, using defaults");
            Config::default()
        }
    }
}

/// Load configuration from environment variables
///
/// All required environment variables must be present. Returns an error
/// if any are missing.
///
/// # Errors
/// Returns `HavenError::Config` if required variables are missing or have
/// invalid values.
pub fn load_from_env() -> Result<Config> {
    let db_path = env_var("HAVEN_DB_PATH")?;
    let db_pool_size = env_var("HAVEN_DB_POOL_SIZE").and_then(|s| {
        s.parse::<u32>().map_err(|e| HavenError::Config(format!("invalid pool size: {e}")))
    })?;

    let grace_period_days = env_var("HAVEN_GRACE_PERIOD_DAYS").and_then(|s| {
        s.parse::<u32>().map_err(|e| HavenError::Config(format!("invalid grace period: {e}")))
    })?;
    let purge_interval_secs = env_var("HAVEN_PURGE_INTERVAL_SECS").and_then(|s| {
        s.parse::<u64>().map_err(|e| HavenError::Config(format!("invalid purge interval: {e}")))
    })?;
    let purge_enabled = env_bool("HAVEN_PURGE_ENABLED", true);

    let admin_ids = std::env::var("HAVEN_ADMIN_IDS")
        .map(|s| {
            s.split(',').map(str::trim).filter(|s| !s.is_empty()).map(String::from).collect()
        })
        .unwrap_or_default();

    Ok(Config {
        database: DatabaseConfig { path: db_path, pool_size: db_pool_size },
        lifecycle: LifecycleConfig { grace_period_days, purge_interval_secs, purge_enabled },
        access: AccessConfig { admin_ids },
    })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `HavenError::Config` if no file is found or parsing fails.
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(HavenError::Config(format!(
                    "config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            HavenError::Config("no config file found in any of the standard locations".into())
        })?,
    };

    tracing::info!(path = %config_path.display(), "loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| HavenError::Config(format!("failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content; format is detected by file
/// extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| HavenError::Config(format!("invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| HavenError::Config(format!("invalid JSON format: {e}"))),
        _ => Err(HavenError::Config(format!("unsupported config format: {extension}"))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(vec![
            cwd.join("config.json"),
            cwd.join("config.toml"),
            cwd.join("haven.json"),
            cwd.join("haven.toml"),
            cwd.join("../config.json"),
            cwd.join("../config.toml"),
            cwd.join("../../config.json"),
            cwd.join("../../config.toml"),
        ]);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(vec![
                exe_dir.join("config.json"),
                exe_dir.join("config.toml"),
                exe_dir.join("haven.json"),
                exe_dir.join("haven.toml"),
            ]);
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

/// Get required environment variable
fn env_var(key: &str) -> Result<String> {
    std::env::var(key)
        .map_err(|_| HavenError::Config(format!("missing required environment variable: {key}")))
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
