//! SQLite profile repository
//!
//! Lifecycle transitions are conditional UPDATEs guarded on the current
//! state, with the audit entry inserted in the same transaction. The guard
//! doubles as the concurrency control: whichever writer matches the row
//! wins, everyone else sees zero rows changed.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use haven_core::ProfileRepository;
use haven_domain::{AuditEntry, HavenError, Profile, Result, Role};
use rusqlite::{params, Row, Transaction};
use tokio::task;

use super::manager::DbManager;
use super::{map_join_error, map_sql_error};

const PROFILE_COLUMNS: &str = "id, role, email, display_name, deletion_scheduled_at, \
     deletion_token, deleted_at, created_at, updated_at";

const INSERT_PROFILE_SQL: &str = "INSERT INTO profiles (
        id, role, email, display_name, deletion_scheduled_at,
        deletion_token, deleted_at, created_at, updated_at
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)";

const SCHEDULE_SQL: &str = "UPDATE profiles
    SET deletion_scheduled_at = ?2, deletion_token = ?3, updated_at = ?4
    WHERE id = ?1 AND deleted_at IS NULL AND deletion_scheduled_at IS NULL";

const CANCEL_SQL: &str = "UPDATE profiles
    SET deletion_scheduled_at = NULL, deletion_token = NULL, updated_at = ?2
    WHERE id = ?1 AND deleted_at IS NULL AND deletion_scheduled_at IS NOT NULL";

const FINALIZE_SQL: &str = "UPDATE profiles
    SET deleted_at = ?2, deletion_scheduled_at = NULL, deletion_token = NULL, updated_at = ?2
    WHERE id = ?1 AND deleted_at IS NULL AND deletion_scheduled_at IS NOT NULL";

const INSERT_AUDIT_SQL: &str = "INSERT INTO audit_log (
        id, action, actor_id, subject_id, detail, occurred_at
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)";

/// SQLite implementation of the profile port.
pub struct SqliteProfileRepository {
    db: Arc<DbManager>,
}

impl SqliteProfileRepository {
    /// Construct a repository backed by the shared database manager.
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProfileRepository for SqliteProfileRepository {
    async fn get_by_id(&self, id: &str) -> Result<Option<Profile>> {
        let db = Arc::clone(&self.db);
        let id = id.to_string();
        task::spawn_blocking(move || -> Result<Option<Profile>> {
            let conn = db.get_connection()?;
            query_profile(&conn, &format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = ?1"), &id)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn find_by_deletion_token(&self, token: &str) -> Result<Option<Profile>> {
        let db = Arc::clone(&self.db);
        let token = token.to_string();
        task::spawn_blocking(move || -> Result<Option<Profile>> {
            let conn = db.get_connection()?;
            query_profile(
                &conn,
                &format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE deletion_token = ?1"),
                &token,
            )
        })
        .await
        .map_err(map_join_error)?
    }

    async fn create(&self, profile: Profile) -> Result<()> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> Result<()> {
            let conn = db.get_connection()?;
            conn.execute(
                INSERT_PROFILE_SQL,
                params![
                    profile.id,
                    profile.role.as_str(),
                    profile.email,
                    profile.display_name,
                    profile.deletion_scheduled_at,
                    profile.deletion_token,
                    profile.deleted_at,
                    profile.created_at,
                    profile.updated_at,
                ],
            )
            .map_err(map_sql_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn schedule_deletion(
        &self,
        id: &str,
        scheduled_at: i64,
        token: &str,
        audit: AuditEntry,
    ) -> Result<()> {
        let db = Arc::clone(&self.db);
        let id = id.to_string();
        let token = token.to_string();
        task::spawn_blocking(move || -> Result<()> {
            db.with_retry(|| {
                let mut conn = db.get_connection()?;
                let tx = conn.transaction().map_err(map_sql_error)?;
                let changed = tx
                    .execute(
                        SCHEDULE_SQL,
                        params![id, scheduled_at, token, Utc::now().timestamp()],
                    )
                    .map_err(map_sql_error)?;
                if changed == 0 {
                    return Err(HavenError::Conflict(
                        "profile is not in a schedulable state".into(),
                    ));
                }
                insert_audit(&tx, &audit)?;
                tx.commit().map_err(map_sql_error)
            })
        })
        .await
        .map_err(map_join_error)?
    }

    async fn cancel_deletion(&self, id: &str, audit: AuditEntry) -> Result<()> {
        let db = Arc::clone(&self.db);
        let id = id.to_string();
        task::spawn_blocking(move || -> Result<()> {
            db.with_retry(|| {
                let mut conn = db.get_connection()?;
                let tx = conn.transaction().map_err(map_sql_error)?;
                let changed = tx
                    .execute(CANCEL_SQL, params![id, Utc::now().timestamp()])
                    .map_err(map_sql_error)?;
                if changed == 0 {
                    return Err(HavenError::Conflict("no pending deletion to cancel".into()));
                }
                insert_audit(&tx, &audit)?;
                tx.commit().map_err(map_sql_error)
            })
        })
        .await
        .map_err(map_join_error)?
    }

    async fn due_for_deletion(&self, now: i64) -> Result<Vec<Profile>> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> Result<Vec<Profile>> {
            let conn = db.get_connection()?;
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {PROFILE_COLUMNS} FROM profiles
                     WHERE deleted_at IS NULL
                       AND deletion_scheduled_at IS NOT NULL
                       AND deletion_scheduled_at <= ?1
                     ORDER BY deletion_scheduled_at"
                ))
                .map_err(map_sql_error)?;
            let profiles = stmt
                .query_map(params![now], map_profile_row)
                .map_err(map_sql_error)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(map_sql_error)?;
            Ok(profiles)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn finalize_deletion(
        &self,
        id: &str,
        deleted_at: i64,
        audit: AuditEntry,
    ) -> Result<bool> {
        let db = Arc::clone(&self.db);
        let id = id.to_string();
        task::spawn_blocking(move || -> Result<bool> {
            db.with_retry(|| {
                let mut conn = db.get_connection()?;
                let tx = conn.transaction().map_err(map_sql_error)?;
                let changed =
                    tx.execute(FINALIZE_SQL, params![id, deleted_at]).map_err(map_sql_error)?;
                if changed == 0 {
                    // Pending state vanished; the dropped transaction rolls
                    // back and no audit entry is written.
                    return Ok(false);
                }
                insert_audit(&tx, &audit)?;
                tx.commit().map_err(map_sql_error)?;
                Ok(true)
            })
        })
        .await
        .map_err(map_join_error)?
    }
}

fn insert_audit(tx: &Transaction<'_>, entry: &AuditEntry) -> Result<()> {
    let detail = serde_json::to_string(&entry.detail)
        .map_err(|err| HavenError::Internal(format!("failed to serialize audit detail: {err}")))?;
    tx.execute(
        INSERT_AUDIT_SQL,
        params![
            entry.id,
            entry.action.as_str(),
            entry.actor_id,
            entry.subject_id,
            detail,
            entry.occurred_at,
        ],
    )
    .map_err(map_sql_error)?;
    Ok(())
}

fn query_profile(
    conn: &rusqlite::Connection,
    sql: &str,
    key: &str,
) -> Result<Option<Profile>> {
    let mut stmt = conn.prepare(sql).map_err(map_sql_error)?;
    let mut rows =
        stmt.query_map(params![key], map_profile_row).map_err(map_sql_error)?;
    match rows.next() {
        Some(row) => Ok(Some(row.map_err(map_sql_error)?)),
        None => Ok(None),
    }
}

fn map_profile_row(row: &Row<'_>) -> rusqlite::Result<Profile> {
    let role_str: String = row.get(1)?;
    let role = Role::parse(&role_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            1,
            rusqlite::types::Type::Text,
            format!("unknown role: {role_str}").into(),
        )
    })?;
    Ok(Profile {
        id: row.get(0)?,
        role,
        email: row.get(2)?,
        display_name: row.get(3)?,
        deletion_scheduled_at: row.get(4)?,
        deletion_token: row.get(5)?,
        deleted_at: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}
