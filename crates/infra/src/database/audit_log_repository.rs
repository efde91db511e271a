//! SQLite audit log repository
//!
//! Append-only: the table has no update or delete statements anywhere in
//! the codebase, and the `seq` column orders entries even when timestamps
//! collide.

use std::sync::Arc;

use async_trait::async_trait;
use haven_core::AuditLogRepository;
use haven_domain::{AuditAction, AuditEntry, HavenError, Result};
use rusqlite::{params, Row};
use tokio::task;

use super::manager::DbManager;
use super::{map_join_error, map_sql_error};

const APPEND_SQL: &str = "INSERT INTO audit_log (
        id, action, actor_id, subject_id, detail, occurred_at
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)";

const LIST_BY_SUBJECT_SQL: &str = "SELECT id, action, actor_id, subject_id, detail, occurred_at
    FROM audit_log
    WHERE subject_id = ?1
    ORDER BY seq";

/// SQLite implementation of the audit ledger port.
pub struct SqliteAuditLogRepository {
    db: Arc<DbManager>,
}

impl SqliteAuditLogRepository {
    /// Construct a repository backed by the shared database manager.
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AuditLogRepository for SqliteAuditLogRepository {
    async fn append(&self, entry: AuditEntry) -> Result<()> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> Result<()> {
            let detail = serde_json::to_string(&entry.detail).map_err(|err| {
                HavenError::Internal(format!("failed to serialize audit detail: {err}"))
            })?;
            db.with_retry(|| {
                let conn = db.get_connection()?;
                conn.execute(
                    APPEND_SQL,
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
            })
        })
        .await
        .map_err(map_join_error)?
    }

    async fn list_by_subject(&self, subject_id: &str) -> Result<Vec<AuditEntry>> {
        let db = Arc::clone(&self.db);
        let subject_id = subject_id.to_string();
        task::spawn_blocking(move || -> Result<Vec<AuditEntry>> {
            let conn = db.get_connection()?;
            let mut stmt = conn.prepare(LIST_BY_SUBJECT_SQL).map_err(map_sql_error)?;
            let entries = stmt
                .query_map(params![subject_id], map_audit_row)
                .map_err(map_sql_error)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(map_sql_error)?;
            Ok(entries)
        })
        .await
        .map_err(map_join_error)?
    }
}

fn map_audit_row(row: &Row<'_>) -> rusqlite::Result<AuditEntry> {
    let action_str: String = row.get(1)?;
    let action = AuditAction::parse(&action_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            1,
            rusqlite::types::Type::Text,
            format!("unknown audit action: {action_str}").into(),
        )
    })?;
    let detail_json: String = row.get(4)?;
    let detail = serde_json::from_str(&detail_json).map_err(|err| {
        rusqlite::Error::FromSqlConversionFailure(
            4,
            rusqlite::types::Type::Text,
            Box::new(err),
        )
    })?;
    Ok(AuditEntry {
        id: row.get(0)?,
        action,
        actor_id: row.get(2)?,
        subject_id: row.get(3)?,
        detail,
        occurred_at: row.get(5)?,
    })
}
