//! Deletion request and undo services - core business logic

use std::sync::Arc;

use chrono::Utc;
use haven_domain::constants::SECONDS_PER_DAY;
use haven_domain::{
    AuditAction, AuditEntry, DeletionReceipt, HavenError, LifecycleConfig, LifecycleState, Result,
    Role,
};
use tracing::{debug, info, warn};

use super::ports::{AccessPolicy, AuditLogRepository, CareLinkRepository, ProfileRepository};
use super::token::{generate_deletion_token, is_plausible_token};

/// Message returned for both unknown and expired undo tokens. The two cases
/// are distinguished in traces only, never to the caller, so a guessed token
/// reveals nothing about whether it ever existed.
const UNDO_FAILED_MSG: &str = "deletion request not found or no longer cancellable";

/// Account lifecycle service: deletion requests, token-based undo, and the
/// read-own-audit-history pass-through.
pub struct AccountLifecycleService {
    profiles: Arc<dyn ProfileRepository>,
    care_links: Arc<dyn CareLinkRepository>,
    audit: Arc<dyn AuditLogRepository>,
    access: Arc<dyn AccessPolicy>,
    config: LifecycleConfig,
}

impl AccountLifecycleService {
    /// Create a new lifecycle service
    pub fn new(
        profiles: Arc<dyn ProfileRepository>,
        care_links: Arc<dyn CareLinkRepository>,
        audit: Arc<dyn AuditLogRepository>,
        access: Arc<dyn AccessPolicy>,
        config: LifecycleConfig,
    ) -> Self {
        Self { profiles, care_links, audit, access, config }
    }

    /// Schedule an account for deletion after the configured grace period.
    ///
    /// The requester must be the account owner or an authorized admin. The
    /// scheduling fields and the `delete_requested` audit entry are
    /// persisted atomically; on any failure the profile is left unchanged.
    pub async fn request_deletion(
        &self,
        requester_id: &str,
        target_id: &str,
    ) -> Result<DeletionReceipt> {
        if !self.access.is_owner_or_admin(requester_id, target_id).await? {
            warn!(requester = %requester_id, target = %target_id, "deletion request denied");
            return Err(HavenError::Auth("not permitted to delete this account".into()));
        }

        let profile = self
            .profiles
            .get_by_id(target_id)
            .await?
            .ok_or_else(|| HavenError::NotFound(format!("profile {target_id} does not exist")))?;

        match profile.lifecycle_state() {
            LifecycleState::Deleted => {
                return Err(HavenError::Conflict("account is already deleted".into()));
            }
            LifecycleState::PendingDeletion => {
                return Err(HavenError::Conflict("a deletion request is already pending".into()));
            }
            LifecycleState::Active => {}
        }

        // A caregiver with linked dependents must hand them off first.
        if profile.role == Role::Caregiver && self.care_links.has_active_links(target_id).await? {
            return Err(HavenError::Conflict(
                "caregiver has active care relationships; transfer or remove them first".into(),
            ));
        }

        let grace_days = self.config.grace_period_days;
        let scheduled_at = Utc::now().timestamp() + i64::from(grace_days) * SECONDS_PER_DAY;
        let token = generate_deletion_token();

        let entry = AuditEntry::new(
            AuditAction::DeleteRequested,
            requester_id,
            target_id,
            serde_json::json!({ "grace_period_days": grace_days }),
        );
        self.profiles.schedule_deletion(target_id, scheduled_at, &token, entry).await?;

        info!(
            target = %target_id,
            grace_period_days = grace_days,
            scheduled_at,
            "account deletion scheduled"
        );

        Ok(DeletionReceipt { deletion_token: token, grace_period_ends_at: scheduled_at })
    }

    /// Cancel a pending deletion using the possession-proof token.
    ///
    /// Requires no authentication beyond token possession: the token was
    /// delivered out-of-band and is itself the proof of intent. Returns the
    /// id of the restored profile.
    ///
    /// An expired grace period and a token that matches nothing are distinct
    /// errors internally but collapse into the same generic `NotFound` here
    /// at the boundary.
    pub async fn cancel_deletion(&self, token: &str) -> Result<String> {
        self.try_cancel_deletion(token).await.map_err(|err| match err {
            HavenError::NotFound(_) | HavenError::Expired(_) => {
                HavenError::NotFound(UNDO_FAILED_MSG.into())
            }
            other => other,
        })
    }

    async fn try_cancel_deletion(&self, token: &str) -> Result<String> {
        if !is_plausible_token(token) {
            return Err(HavenError::Validation("malformed deletion token".into()));
        }

        let Some(profile) = self.profiles.find_by_deletion_token(token).await? else {
            debug!("undo token matched no profile");
            return Err(HavenError::NotFound("no profile holds this token".into()));
        };

        let now = Utc::now().timestamp();
        if !profile.is_cancellable_at(now) {
            debug!(profile = %profile.id, "undo token arrived after grace period expiry");
            return Err(HavenError::Expired("grace period elapsed before undo".into()));
        }

        let entry = AuditEntry::new(
            AuditAction::DeleteCancelled,
            profile.id.clone(),
            profile.id.clone(),
            serde_json::Value::Null,
        );
        self.profiles.cancel_deletion(&profile.id, entry).await?;

        info!(profile = %profile.id, "account deletion cancelled");
        Ok(profile.id)
    }

    /// Audit history for a subject, readable by the owner or an admin.
    pub async fn audit_history(
        &self,
        caller_id: &str,
        subject_id: &str,
    ) -> Result<Vec<AuditEntry>> {
        if !self.access.is_owner_or_admin(caller_id, subject_id).await? {
            return Err(HavenError::Auth("not permitted to read this audit history".into()));
        }
        self.audit.list_by_subject(subject_id).await
    }
}
