//! Scheduled purge - grace-period enforcement and the hard-delete cascade
//!
//! The state-machine enforcer. Finds accounts whose grace period has
//! expired, removes their dependent records in a fixed order, and writes
//! the terminal mark last. Every step is a set-based delete, so re-running
//! after a crash or alongside a concurrent run converges to the same end
//! state without a distributed lock.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use haven_domain::constants::PURGE_JOB_ACTOR_ID;
use haven_domain::{
    AccountPurgeError, AuditAction, AuditEntry, DeletedCounts, Profile, PurgeSummary, Result,
};
use tracing::{error, info, instrument, warn};

use super::ports::{
    CareLinkRepository, CheckInRepository, ClinicalNoteRepository, ConsentRepository,
    CrisisPlanRepository, ProfileRepository,
};

/// Outcome of one account's cascade
enum AccountOutcome {
    /// Cascade completed and the terminal mark was written
    Deleted(DeletedCounts),
    /// The pending state vanished before the terminal mark (undo raced in
    /// or a concurrent run finished first); nothing was marked
    Skipped,
}

/// Hard-delete purge service
pub struct PurgeService {
    profiles: Arc<dyn ProfileRepository>,
    check_ins: Arc<dyn CheckInRepository>,
    crisis_plans: Arc<dyn CrisisPlanRepository>,
    clinical_notes: Arc<dyn ClinicalNoteRepository>,
    care_links: Arc<dyn CareLinkRepository>,
    consents: Arc<dyn ConsentRepository>,
}

impl PurgeService {
    /// Create a new purge service
    pub fn new(
        profiles: Arc<dyn ProfileRepository>,
        check_ins: Arc<dyn CheckInRepository>,
        crisis_plans: Arc<dyn CrisisPlanRepository>,
        clinical_notes: Arc<dyn ClinicalNoteRepository>,
        care_links: Arc<dyn CareLinkRepository>,
        consents: Arc<dyn ConsentRepository>,
    ) -> Self {
        Self { profiles, check_ins, crisis_plans, clinical_notes, care_links, consents }
    }

    /// Run one purge pass over all due accounts.
    ///
    /// Each account is processed independently: a failed cascade is
    /// recorded in the summary, leaves that account pending (still due on
    /// the next run), and never aborts the batch.
    #[instrument(skip(self))]
    pub async fn run_once(&self) -> Result<PurgeSummary> {
        let started = Instant::now();
        let now = Utc::now().timestamp();

        let due = self.profiles.due_for_deletion(now).await?;
        let mut summary = PurgeSummary { due: due.len(), ..PurgeSummary::default() };

        info!(due = due.len(), "purge run started");

        for profile in due {
            match self.purge_account(&profile).await {
                Ok(AccountOutcome::Deleted(counts)) => {
                    summary.succeeded += 1;
                    info!(
                        profile = %profile.id,
                        deleted = counts.total(),
                        "account hard-deleted"
                    );
                }
                Ok(AccountOutcome::Skipped) => {
                    summary.skipped += 1;
                    info!(profile = %profile.id, "account no longer pending; skipped");
                }
                Err(err) => {
                    summary.failed += 1;
                    error!(profile = %profile.id, error = %err, "account cascade failed");
                    summary.errors.push(AccountPurgeError {
                        profile_id: profile.id.clone(),
                        message: err.to_string(),
                    });
                }
            }
        }

        summary.elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        info!(
            due = summary.due,
            succeeded = summary.succeeded,
            failed = summary.failed,
            skipped = summary.skipped,
            elapsed_ms = summary.elapsed_ms,
            "purge run completed"
        );

        Ok(summary)
    }

    /// Cascade one account.
    ///
    /// Deletion order respects every relationship reference: check-ins,
    /// crisis plans, clinical notes (author and subject), care links (both
    /// directions), consents, then the terminal profile mark. The mark and
    /// its `hard_deleted` audit entry are written atomically, and only
    /// after every dependent delete succeeded.
    async fn purge_account(&self, profile: &Profile) -> Result<AccountOutcome> {
        let id = profile.id.as_str();

        let counts = DeletedCounts {
            check_ins: self.check_ins.delete_for_user(id).await?,
            crisis_plans: self.crisis_plans.delete_for_user(id).await?,
            clinical_notes: self.clinical_notes.delete_for_user(id).await?,
            care_links: self.care_links.delete_for_user(id).await?,
            consents: self.consents.delete_for_user(id).await?,
        };

        let deleted_at = Utc::now().timestamp();
        let entry = AuditEntry::new(
            AuditAction::HardDeleted,
            PURGE_JOB_ACTOR_ID,
            id,
            serde_json::json!({ "deleted_counts": counts }),
        );

        let marked = self.profiles.finalize_deletion(id, deleted_at, entry).await?;
        if marked {
            Ok(AccountOutcome::Deleted(counts))
        } else {
            // Dependent records are already gone; with an undo this is the
            // narrow race the design accepts, and with a concurrent run the
            // deletes were no-ops anyway.
            warn!(profile = %id, "terminal mark rejected; pending state was cleared mid-cascade");
            Ok(AccountOutcome::Skipped)
        }
    }
}
