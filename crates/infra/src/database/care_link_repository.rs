//! SQLite care link repository
//!
//! A link references a patient and a caregiver; per-user operations match
//! either side. `has_active_links` backs the caregiver hand-off rule.

use std::sync::Arc;

use async_trait::async_trait;
use haven_core::CareLinkRepository;
use haven_domain::{CareLink, Result};
use rusqlite::params;
use tokio::task;

use super::manager::DbManager;
use super::{map_join_error, map_sql_error};

const INSERT_SQL: &str = "INSERT INTO care_links (id, patient_id, caregiver_id, created_at)
    VALUES (?1, ?2, ?3, ?4)";

const COUNT_SQL: &str =
    "SELECT COUNT(*) FROM care_links WHERE patient_id = ?1 OR caregiver_id = ?1";

const DELETE_SQL: &str = "DELETE FROM care_links WHERE patient_id = ?1 OR caregiver_id = ?1";

const HAS_ACTIVE_SQL: &str =
    "SELECT EXISTS(SELECT 1 FROM care_links WHERE caregiver_id = ?1)";

/// SQLite implementation of the care link port.
pub struct SqliteCareLinkRepository {
    db: Arc<DbManager>,
}

impl SqliteCareLinkRepository {
    /// Construct a repository backed by the shared database manager.
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CareLinkRepository for SqliteCareLinkRepository {
    async fn insert(&self, link: CareLink) -> Result<()> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> Result<()> {
            let conn = db.get_connection()?;
            conn.execute(
                INSERT_SQL,
                params![link.id, link.patient_id, link.caregiver_id, link.created_at],
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

    async fn has_active_links(&self, caregiver_id: &str) -> Result<bool> {
        let db = Arc::clone(&self.db);
        let caregiver_id = caregiver_id.to_string();
        task::spawn_blocking(move || -> Result<bool> {
            let conn = db.get_connection()?;
            conn.query_row(HAS_ACTIVE_SQL, params![caregiver_id], |row| row.get(0))
                .map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }
}
