//! SQLite crisis plan repository

use std::sync::Arc;

use async_trait::async_trait;
use haven_core::CrisisPlanRepository;
use haven_domain::{CrisisPlan, Result};
use rusqlite::params;
use tokio::task;

use super::manager::DbManager;
use super::{map_join_error, map_sql_error};

const INSERT_SQL: &str = "INSERT INTO crisis_plans (id, user_id, plan_text, updated_at)
    VALUES (?1, ?2, ?3, ?4)";

const COUNT_SQL: &str = "SELECT COUNT(*) FROM crisis_plans WHERE user_id = ?1";

const DELETE_SQL: &str = "DELETE FROM crisis_plans WHERE user_id = ?1";

/// SQLite implementation of the crisis plan port.
pub struct SqliteCrisisPlanRepository {
    db: Arc<DbManager>,
}

impl SqliteCrisisPlanRepository {
    /// Construct a repository backed by the shared database manager.
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CrisisPlanRepository for SqliteCrisisPlanRepository {
    async fn insert(&self, plan: CrisisPlan) -> Result<()> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> Result<()> {
            let conn = db.get_connection()?;
            conn.execute(
                INSERT_SQL,
                params![plan.id, plan.user_id, plan.plan_text, plan.updated_at],
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

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    async fn setup() -> (SqliteCrisisPlanRepository, TempDir) {
        let temp_dir = TempDir::new().expect("temp dir created");
        let manager =
            Arc::new(DbManager::new(temp_dir.path().join("plans.db"), 4).expect("manager"));
        manager.run_migrations().expect("migrations run");
        (SqliteCrisisPlanRepository::new(manager), temp_dir)
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn delete_for_user_is_scoped_and_idempotent() {
        let (repo, _temp_dir) = setup().await;
        repo.insert(CrisisPlan {
            id: "p1".into(),
            user_id: "u1".into(),
            plan_text: "call my sister".into(),
            updated_at: 1_000,
        })
        .await
        .expect("insert p1");
        repo.insert(CrisisPlan {
            id: "p2".into(),
            user_id: "u2".into(),
            plan_text: "breathing exercise".into(),
            updated_at: 1_000,
        })
        .await
        .expect("insert p2");

        assert_eq!(repo.delete_for_user("u1").await.expect("delete"), 1);
        assert_eq!(repo.delete_for_user("u1").await.expect("second delete"), 0);
        assert_eq!(repo.count_for_user("u2").await.expect("count u2"), 1);
    }
}
