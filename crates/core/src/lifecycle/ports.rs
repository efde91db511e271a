//! Port interfaces for the deletion lifecycle
//!
//! These traits define the boundaries between core business logic
//! and infrastructure implementations. Lifecycle transitions that must be
//! provable after the fact take the audit entry alongside the state change
//! so the implementation can persist both atomically.

use async_trait::async_trait;
use haven_domain::{
    AuditEntry, CareLink, CheckIn, ClinicalNote, ConsentRecord, CrisisPlan, Profile, Result,
};

/// Trait for profile persistence and lifecycle transitions
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Get a profile by id, tombstones included
    async fn get_by_id(&self, id: &str) -> Result<Option<Profile>>;

    /// Find the profile holding the given deletion token
    async fn find_by_deletion_token(&self, token: &str) -> Result<Option<Profile>>;

    /// Create a new profile (signup path, used here by tests and seeding)
    async fn create(&self, profile: Profile) -> Result<()>;

    /// Move an active profile to pending deletion.
    ///
    /// Sets `deletion_scheduled_at` and `deletion_token` and appends the
    /// audit entry in the same transaction. Fails with a conflict if the
    /// profile is already pending or deleted.
    async fn schedule_deletion(
        &self,
        id: &str,
        scheduled_at: i64,
        token: &str,
        audit: AuditEntry,
    ) -> Result<()>;

    /// Move a pending profile back to active.
    ///
    /// Clears both lifecycle fields and appends the audit entry in the same
    /// transaction. Fails with a conflict if the profile is no longer
    /// pending.
    async fn cancel_deletion(&self, id: &str, audit: AuditEntry) -> Result<()>;

    /// Profiles whose grace period has expired and that are not yet deleted
    async fn due_for_deletion(&self, now: i64) -> Result<Vec<Profile>>;

    /// Terminally mark a profile as deleted.
    ///
    /// Sets `deleted_at`, clears the schedule and token, and appends the
    /// audit entry in the same transaction. The write is conditional on the
    /// profile still being pending; returns `false` (and writes nothing,
    /// including the audit entry) when the pending state vanished in the
    /// meantime.
    async fn finalize_deletion(&self, id: &str, deleted_at: i64, audit: AuditEntry)
        -> Result<bool>;
}

/// Trait for the append-only audit ledger
///
/// Write path for collaborators that audit outside a lifecycle transition
/// (e.g. export requests), plus the read-your-own-history query. No update
/// or delete operations exist.
#[async_trait]
pub trait AuditLogRepository: Send + Sync {
    /// Append one entry
    async fn append(&self, entry: AuditEntry) -> Result<()>;

    /// All entries for a subject, ordered by time ascending
    async fn list_by_subject(&self, subject_id: &str) -> Result<Vec<AuditEntry>>;
}

/// Trait for check-in persistence
#[async_trait]
pub trait CheckInRepository: Send + Sync {
    /// Insert a check-in
    async fn insert(&self, check_in: CheckIn) -> Result<()>;

    /// Count check-ins owned by a user
    async fn count_for_user(&self, user_id: &str) -> Result<usize>;

    /// Delete all check-ins owned by a user, returning how many were removed
    async fn delete_for_user(&self, user_id: &str) -> Result<usize>;
}

/// Trait for crisis plan persistence
#[async_trait]
pub trait CrisisPlanRepository: Send + Sync {
    /// Insert a crisis plan
    async fn insert(&self, plan: CrisisPlan) -> Result<()>;

    /// Count plans owned by a user
    async fn count_for_user(&self, user_id: &str) -> Result<usize>;

    /// Delete all plans owned by a user, returning how many were removed
    async fn delete_for_user(&self, user_id: &str) -> Result<usize>;
}

/// Trait for clinical note persistence
///
/// Notes reference a user on two sides; counting and deleting for a user
/// covers both the author and the subject columns.
#[async_trait]
pub trait ClinicalNoteRepository: Send + Sync {
    /// Insert a clinical note
    async fn insert(&self, note: ClinicalNote) -> Result<()>;

    /// Count notes where the user is author or subject
    async fn count_for_user(&self, user_id: &str) -> Result<usize>;

    /// Delete notes where the user is author or subject
    async fn delete_for_user(&self, user_id: &str) -> Result<usize>;
}

/// Trait for care relationship persistence
#[async_trait]
pub trait CareLinkRepository: Send + Sync {
    /// Insert a care link
    async fn insert(&self, link: CareLink) -> Result<()>;

    /// Count links referencing the user on either side
    async fn count_for_user(&self, user_id: &str) -> Result<usize>;

    /// Delete links referencing the user on either side
    async fn delete_for_user(&self, user_id: &str) -> Result<usize>;

    /// Whether a caregiver still has dependents linked to them
    async fn has_active_links(&self, caregiver_id: &str) -> Result<bool>;
}

/// Trait for consent record persistence
#[async_trait]
pub trait ConsentRepository: Send + Sync {
    /// Insert a consent record
    async fn insert(&self, consent: ConsentRecord) -> Result<()>;

    /// Count consent records owned by a user
    async fn count_for_user(&self, user_id: &str) -> Result<usize>;

    /// Delete all consent records owned by a user
    async fn delete_for_user(&self, user_id: &str) -> Result<usize>;
}

/// Authorization decision supplied by the identity collaborator
///
/// The core never verifies credentials itself; it only consumes the
/// owner-or-admin decision.
#[async_trait]
pub trait AccessPolicy: Send + Sync {
    /// Whether `caller_id` may act on `target_id`'s account
    async fn is_owner_or_admin(&self, caller_id: &str, target_id: &str) -> Result<bool>;
}
