//! Dependent record types
//!
//! Per-user collections purged during a hard delete. Each is owned by one
//! profile, except care links which reference two (patient + caregiver).
//! Created by normal application use; destroyed only by the purge cascade.

use serde::{Deserialize, Serialize};

/// Daily mood/wellness check-in
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckIn {
    pub id: String,
    pub user_id: String,
    pub mood_score: i64,
    pub note: Option<String>,
    pub created_at: i64,
}

/// Crisis safety plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrisisPlan {
    pub id: String,
    pub user_id: String,
    pub plan_text: String,
    pub updated_at: i64,
}

/// Clinical note written by one user about another
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClinicalNote {
    pub id: String,
    pub author_id: String,
    pub subject_id: String,
    pub body: String,
    pub created_at: i64,
}

/// Care relationship between a patient and a caregiver
///
/// An existing link counts as an active relationship; removing or
/// transferring the link is how a relationship ends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CareLink {
    pub id: String,
    pub patient_id: String,
    pub caregiver_id: String,
    pub created_at: i64,
}

/// Consent record granted by a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsentRecord {
    pub id: String,
    pub user_id: String,
    pub scope: String,
    pub granted_at: i64,
    pub revoked_at: Option<i64>,
}
