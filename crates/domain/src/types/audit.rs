//! Audit log types
//!
//! Append-only ledger of lifecycle events. Entries are immutable once
//! written; the store exposes no update or delete surface.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of lifecycle event recorded in the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    DeleteRequested,
    DeleteCancelled,
    HardDeleted,
    ExportRequested,
}

impl AuditAction {
    /// Storage representation of the action.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DeleteRequested => "delete_requested",
            Self::DeleteCancelled => "delete_cancelled",
            Self::HardDeleted => "hard_deleted",
            Self::ExportRequested => "export_requested",
        }
    }

    /// Parse the storage representation back into an action.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "delete_requested" => Some(Self::DeleteRequested),
            "delete_cancelled" => Some(Self::DeleteCancelled),
            "hard_deleted" => Some(Self::HardDeleted),
            "export_requested" => Some(Self::ExportRequested),
            _ => None,
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One audit log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: String,
    pub action: AuditAction,
    /// Who performed the action: the user, an admin, or the system job
    pub actor_id: String,
    /// The affected profile
    pub subject_id: String,
    /// Structured detail payload (counts, grace period, environment tag)
    pub detail: serde_json::Value,
    pub occurred_at: i64,
}

impl AuditEntry {
    /// Create an entry stamped with the current time and a fresh id.
    pub fn new(
        action: AuditAction,
        actor_id: impl Into<String>,
        subject_id: impl Into<String>,
        detail: serde_json::Value,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            action,
            actor_id: actor_id.into(),
            subject_id: subject_id.into(),
            detail,
            occurred_at: Utc::now().timestamp(),
        }
    }
}
