//! SQLite-backed persistence layer
//!
//! One repository per store, all sharing the pooled [`DbManager`]. Blocking
//! rusqlite work runs on the tokio blocking pool.

mod audit_log_repository;
mod care_link_repository;
mod check_in_repository;
mod clinical_note_repository;
mod consent_repository;
mod crisis_plan_repository;
mod manager;
mod pool;
mod profile_repository;
mod retry;

pub use audit_log_repository::SqliteAuditLogRepository;
pub use care_link_repository::SqliteCareLinkRepository;
pub use check_in_repository::SqliteCheckInRepository;
pub use clinical_note_repository::SqliteClinicalNoteRepository;
pub use consent_repository::SqliteConsentRepository;
pub use crisis_plan_repository::SqliteCrisisPlanRepository;
pub use manager::DbManager;
pub use profile_repository::SqliteProfileRepository;
pub use retry::RetryPolicy;

use haven_domain::HavenError;

use crate::errors::InfraError;

pub(crate) fn map_sql_error(err: rusqlite::Error) -> HavenError {
    HavenError::from(InfraError::from(err))
}

pub(crate) fn map_join_error(err: tokio::task::JoinError) -> HavenError {
    HavenError::from(InfraError::from(err))
}
