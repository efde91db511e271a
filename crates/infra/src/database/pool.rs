//! SQLite pool helpers
//!
//! Thin wrapper around an r2d2 pool of rusqlite connections. Every
//! connection handed out has the session pragmas applied.

use std::path::Path;

use haven_domain::Result;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;

use crate::errors::InfraError;

/// Pragmas applied to every pooled connection.
///
/// WAL keeps readers from blocking the purge writer; the busy timeout covers
/// short write bursts before the retry policy kicks in.
const SESSION_PRAGMAS: &str = "
    PRAGMA journal_mode = WAL;
    PRAGMA synchronous = NORMAL;
    PRAGMA foreign_keys = ON;
    PRAGMA busy_timeout = 5000;
";

/// Create an r2d2 pool for the database at `path`.
pub(crate) fn create_pool<P: AsRef<Path>>(
    path: P,
    pool_size: u32,
) -> Result<Pool<SqliteConnectionManager>> {
    let manager = SqliteConnectionManager::file(path.as_ref())
        .with_init(|conn| conn.execute_batch(SESSION_PRAGMAS));

    Pool::builder()
        .max_size(pool_size.max(1))
        .build(manager)
        .map_err(|err| InfraError::from(err).into())
}
