//! SQLite check-in repository

use std::sync::Arc;

use async_trait::async_trait;
use haven_core::CheckInRepository;
use haven_domain::{CheckIn, Result};
use rusqlite::params;
use tokio::task;

use super::manager::DbManager;
use super::{map_join_error, map_sql_error};

const INSERT_SQL: &str = "INSERT INTO check_ins (id, user_id, mood_score, note, created_at)
    VALUES (?1, ?2, ?3, ?4, ?5)";

const COUNT_SQL: &str = "SELECT COUNT(*) FROM check_ins WHERE user_id = ?1";

const DELETE_SQL: &str = "DELETE FROM check_ins WHERE user_id = ?1";

/// SQLite implementation of the check-in port.
pub struct SqliteCheckInRepository {
    db: Arc<DbManager>,
}

impl SqliteCheckInRepository {
    /// Construct a repository backed by the shared database manager.
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CheckInRepository for SqliteCheckInRepository {
    async fn insert(&self, check_in: CheckIn) -> Result<()> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> Result<()> {
            let conn = db.get_connection()?;
            conn.execute(
                INSERT_SQL,
                params![
                    check_in.id,
                    check_in.user_id,
                    check_in.mood_score,
                    check_in.note,
                    check_in.created_at,
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
