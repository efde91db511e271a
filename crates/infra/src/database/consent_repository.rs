//! SQLite consent record repository

use std::sync::Arc;

use async_trait::async_trait;
use haven_core::ConsentRepository;
use haven_domain::{ConsentRecord, Result};
use rusqlite::params;
use tokio::task;

use super::manager::DbManager;
use super::{map_join_error, map_sql_error};

const INSERT_SQL: &str = "INSERT INTO consents (id, user_id, scope, granted_at, revoked_at)
    VALUES (?1, ?2, ?3, ?4, ?5)";

const COUNT_SQL: &str = "SELECT COUNT(*) FROM consents WHERE user_id = ?1";

const DELETE_SQL: &str = "DELETE FROM consents WHERE user_id = ?1";

/// SQLite implementation of the consent port.
pub struct SqliteConsentRepository {
    db: Arc<DbManager>,
}

impl SqliteConsentRepository {
    /// Construct a repository backed by the shared database manager.
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ConsentRepository for SqliteConsentRepository {
    async fn insert(&self, consent: ConsentRecord) -> Result<()> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> Result<()> {
            let conn = db.get_connection()?;
            conn.execute(
                INSERT_SQL,
                params![
                    consent.id,
                    consent.user_id,
                    consent.scope,
                    consent.granted_at,
                    consent.revoked_at,
                ],
            )
            .map_err(map_sql_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn count_for_user(&self, user_id: &str) -> Result<usize> {
        let db = Arc::clone(&self.db);
        let user_id = user_id.to_string();
        task::spawn_blocking(move || -> Result<usize> {
            let conn = db.get_connection()?;
            let count: i64 = conn
                .query_row(COUNT_SQL, params![user_id], |row| row.get(0))
                .map_err(map_sql_error)?;
            Ok(usize::try_from(count).unwrap_or(0))
        })
        .await
        .map_err(map_join_error)?
    }

    async fn delete_for_user(&self, user_id: &str) -> Result<usize> {
        let db = Arc::clone(&self.db);
        let user_id = user_id.to_string();
        task::spawn_blocking(move || -> Result<usize> {
            db.with_retry(|| {
                let conn = db.get_connection()?;
                conn.execute(DELETE_SQL, params![user_id]).map_err(map_sql_error)
            })
        })
        .await
        .map_err(map_join_error)?
    }
}
