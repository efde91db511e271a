//! Profile types
//!
//! One profile per account. The profile row carries the deletion lifecycle
//! fields and is never physically removed; after a hard delete it remains as
//! a tombstone identified by `deleted_at`.

use serde::{Deserialize, Serialize};

/// Account role; business rules depend on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Patient,
    Caregiver,
    Admin,
}

impl Role {
    /// Storage representation of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Patient => "patient",
            Self::Caregiver => "caregiver",
            Self::Admin => "admin",
        }
    }

    /// Parse the storage representation back into a role.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "patient" => Some(Self::Patient),
            "caregiver" => Some(Self::Caregiver),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derived lifecycle state of a profile.
///
/// At most one state holds at any time: `deleted_at` wins over a pending
/// schedule, and a pending schedule always carries a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    Active,
    PendingDeletion,
    Deleted,
}

/// User profile stored in the local database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub role: Role,
    pub email: String,
    pub display_name: Option<String>,
    /// When the grace period ends and the account becomes due for purge
    pub deletion_scheduled_at: Option<i64>,
    /// Bearer secret proving the right to undo a pending deletion
    pub deletion_token: Option<String>,
    /// Terminal marker; set exactly once, never unset
    pub deleted_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Profile {
    /// Current lifecycle state derived from the lifecycle fields.
    pub fn lifecycle_state(&self) -> LifecycleState {
        if self.deleted_at.is_some() {
            LifecycleState::Deleted
        } else if self.deletion_scheduled_at.is_some() {
            LifecycleState::PendingDeletion
        } else {
            LifecycleState::Active
        }
    }

    /// Whether a deletion request can still be undone at `now`.
    pub fn is_cancellable_at(&self, now: i64) -> bool {
        match (self.deleted_at, self.deletion_scheduled_at) {
            (None, Some(scheduled_at)) => now < scheduled_at,
            _ => false,
        }
    }
}

/// Outcome of a successful deletion request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletionReceipt {
    /// Token delivered out-of-band to the requester; possession proves the
    /// right to cancel
    pub deletion_token: String,
    /// Unix timestamp at which the grace period ends
    pub grace_period_ends_at: i64,
}
