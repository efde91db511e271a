//! Mock repository implementations for testing
//!
//! Provides in-memory mocks for all core lifecycle ports, enabling
//! deterministic unit tests without database dependencies. The profile mock
//! mirrors the conditional-transition semantics of the real store so state
//! machine tests exercise the same guards.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use haven_core::{
    AccessPolicy, AuditLogRepository, CareLinkRepository, CheckInRepository,
    ClinicalNoteRepository, ConsentRepository, CrisisPlanRepository, ProfileRepository,
};
use haven_domain::{
    AuditEntry, CareLink, CheckIn, ClinicalNote, ConsentRecord, CrisisPlan, HavenError, Profile,
    Result as DomainResult,
};

/// In-memory append-only audit sink shared across mocks.
#[derive(Default)]
pub struct MockAuditLog {
    entries: Mutex<Vec<AuditEntry>>,
}

impl MockAuditLog {
    /// Snapshot of every entry appended so far.
    pub fn entries(&self) -> Vec<AuditEntry> {
        self.entries.lock().expect("audit lock").clone()
    }
}

#[async_trait]
impl AuditLogRepository for MockAuditLog {
    async fn append(&self, entry: AuditEntry) -> DomainResult<()> {
        self.entries.lock().expect("audit lock").push(entry);
        Ok(())
    }

    async fn list_by_subject(&self, subject_id: &str) -> DomainResult<Vec<AuditEntry>> {
        Ok(self
            .entries
            .lock()
            .expect("audit lock")
            .iter()
            .filter(|e| e.subject_id == subject_id)
            .cloned()
            .collect())
    }
}

/// In-memory mock for `ProfileRepository` with the same conditional
/// transition guards as the SQLite implementation.
pub struct MockProfileRepository {
    profiles: Mutex<HashMap<String, Profile>>,
    audit: Arc<MockAuditLog>,
}

impl MockProfileRepository {
    pub fn new(audit: Arc<MockAuditLog>) -> Self {
        Self { profiles: Mutex::new(HashMap::new()), audit }
    }

    /// Direct state inspection for assertions.
    pub fn snapshot(&self, id: &str) -> Option<Profile> {
        self.profiles.lock().expect("profile lock").get(id).cloned()
    }

    /// Force the schedule into the past so an account becomes due.
    pub fn backdate_schedule(&self, id: &str, scheduled_at: i64) {
        let mut profiles = self.profiles.lock().expect("profile lock");
        if let Some(profile) = profiles.get_mut(id) {
            profile.deletion_scheduled_at = Some(scheduled_at);
        }
    }

    fn append_audit(&self, entry: AuditEntry) {
        self.audit.entries.lock().expect("audit lock").push(entry);
    }
}

#[async_trait]
impl ProfileRepository for MockProfileRepository {
    async fn get_by_id(&self, id: &str) -> DomainResult<Option<Profile>> {
        Ok(self.profiles.lock().expect("profile lock").get(id).cloned())
    }

    async fn find_by_deletion_token(&self, token: &str) -> DomainResult<Option<Profile>> {
        Ok(self
            .profiles
            .lock()
            .expect("profile lock")
            .values()
            .find(|p| p.deletion_token.as_deref() == Some(token))
            .cloned())
    }

    async fn create(&self, profile: Profile) -> DomainResult<()> {
        self.profiles.lock().expect("profile lock").insert(profile.id.clone(), profile);
        Ok(())
    }

    async fn schedule_deletion(
        &self,
        id: &str,
        scheduled_at: i64,
        token: &str,
        audit: AuditEntry,
    ) -> DomainResult<()> {
        let mut profiles = self.profiles.lock().expect("profile lock");
        let profile = profiles
            .get_mut(id)
            .ok_or_else(|| HavenError::NotFound(format!("profile {id} does not exist")))?;
        if profile.deleted_at.is_some() || profile.deletion_scheduled_at.is_some() {
            return Err(HavenError::Conflict("deletion already pending or account deleted".into()));
        }
        profile.deletion_scheduled_at = Some(scheduled_at);
        profile.deletion_token = Some(token.to_string());
        drop(profiles);
        self.append_audit(audit);
        Ok(())
    }

    async fn cancel_deletion(&self, id: &str, audit: AuditEntry) -> DomainResult<()> {
        let mut profiles = self.profiles.lock().expect("profile lock");
        let profile = profiles
            .get_mut(id)
            .ok_or_else(|| HavenError::NotFound(format!("profile {id} does not exist")))?;
        if profile.deleted_at.is_some() || profile.deletion_scheduled_at.is_none() {
            return Err(HavenError::Conflict("no pending deletion to cancel".into()));
        }
        profile.deletion_scheduled_at = None;
        profile.deletion_token = None;
        drop(profiles);
        self.append_audit(audit);
        Ok(())
    }

    async fn due_for_deletion(&self, now: i64) -> DomainResult<Vec<Profile>> {
        Ok(self
            .profiles
            .lock()
            .expect("profile lock")
            .values()
            .filter(|p| p.deleted_at.is_none() && p.deletion_scheduled_at.is_some_and(|t| t <= now))
            .cloned()
            .collect())
    }

    async fn finalize_deletion(
        &self,
        id: &str,
        deleted_at: i64,
        audit: AuditEntry,
    ) -> DomainResult<bool> {
        let mut profiles = self.profiles.lock().expect("profile lock");
        let Some(profile) = profiles.get_mut(id) else {
            return Ok(false);
        };
        if profile.deleted_at.is_some() || profile.deletion_scheduled_at.is_none() {
            return Ok(false);
        }
        profile.deleted_at = Some(deleted_at);
        profile.deletion_scheduled_at = None;
        profile.deletion_token = None;
        drop(profiles);
        self.append_audit(audit);
        Ok(true)
    }
}

/// Failure injection shared by the dependent-store mocks: deletes fail for
/// one targeted user, leaving other accounts in the same batch unaffected.
#[derive(Default)]
struct FailureSwitch(Mutex<Option<String>>);

impl FailureSwitch {
    fn target(&self, user_id: Option<&str>) {
        *self.0.lock().expect("failure lock") = user_id.map(str::to_string);
    }

    fn check(&self, user_id: &str) -> DomainResult<()> {
        if self.0.lock().expect("failure lock").as_deref() == Some(user_id) {
            Err(HavenError::Database("simulated storage failure".into()))
        } else {
            Ok(())
        }
    }
}

/// In-memory mock for `CheckInRepository` with an injectable delete failure.
#[derive(Default)]
pub struct MockCheckInRepository {
    rows: Mutex<Vec<CheckIn>>,
    fail_deletes: FailureSwitch,
}

impl MockCheckInRepository {
    /// Make deletes fail for the given user (or `None` to clear).
    pub fn fail_deletes_for(&self, user_id: Option<&str>) {
        self.fail_deletes.target(user_id);
    }

    pub fn len(&self) -> usize {
        self.rows.lock().expect("rows lock").len()
    }
}

/// In-memory mock for `CrisisPlanRepository`.
#[derive(Default)]
pub struct MockCrisisPlanRepository {
    rows: Mutex<Vec<CrisisPlan>>,
    fail_deletes: FailureSwitch,
}

impl MockCrisisPlanRepository {
    /// Make deletes fail for the given user (or `None` to clear).
    pub fn fail_deletes_for(&self, user_id: Option<&str>) {
        self.fail_deletes.target(user_id);
    }

    pub fn len(&self) -> usize {
        self.rows.lock().expect("rows lock").len()
    }
}

/// In-memory mock for `ConsentRepository`.
#[derive(Default)]
pub struct MockConsentRepository {
    rows: Mutex<Vec<ConsentRecord>>,
    fail_deletes: FailureSwitch,
}

impl MockConsentRepository {
    /// Make deletes fail for the given user (or `None` to clear).
    pub fn fail_deletes_for(&self, user_id: Option<&str>) {
        self.fail_deletes.target(user_id);
    }

    pub fn len(&self) -> usize {
        self.rows.lock().expect("rows lock").len()
    }
}

#[async_trait]
impl CheckInRepository for MockCheckInRepository {
    async fn insert(&self, check_in: CheckIn) -> DomainResult<()> {
        self.rows.lock().expect("rows lock").push(check_in);
        Ok(())
    }

    async fn count_for_user(&self, user_id: &str) -> DomainResult<usize> {
        Ok(self.rows.lock().expect("rows lock").iter().filter(|r| r.user_id == user_id).count())
    }

    async fn delete_for_user(&self, user_id: &str) -> DomainResult<usize> {
        self.fail_deletes.check(user_id)?;
        let mut rows = self.rows.lock().expect("rows lock");
        let before = rows.len();
        rows.retain(|r| r.user_id != user_id);
        Ok(before - rows.len())
    }
}

#[async_trait]
impl CrisisPlanRepository for MockCrisisPlanRepository {
    async fn insert(&self, plan: CrisisPlan) -> DomainResult<()> {
        self.rows.lock().expect("rows lock").push(plan);
        Ok(())
    }

    async fn count_for_user(&self, user_id: &str) -> DomainResult<usize> {
        Ok(self.rows.lock().expect("rows lock").iter().filter(|r| r.user_id == user_id).count())
    }

    async fn delete_for_user(&self, user_id: &str) -> DomainResult<usize> {
        self.fail_deletes.check(user_id)?;
        let mut rows = self.rows.lock().expect("rows lock");
        let before = rows.len();
        rows.retain(|r| r.user_id != user_id);
        Ok(before - rows.len())
    }
}

#[async_trait]
impl ConsentRepository for MockConsentRepository {
    async fn insert(&self, consent: ConsentRecord) -> DomainResult<()> {
        self.rows.lock().expect("rows lock").push(consent);
        Ok(())
    }

    async fn count_for_user(&self, user_id: &str) -> DomainResult<usize> {
        Ok(self.rows.lock().expect("rows lock").iter().filter(|r| r.user_id == user_id).count())
    }

    async fn delete_for_user(&self, user_id: &str) -> DomainResult<usize> {
        self.fail_deletes.check(user_id)?;
        let mut rows = self.rows.lock().expect("rows lock");
        let before = rows.len();
        rows.retain(|r| r.user_id != user_id);
        Ok(before - rows.len())
    }
}

/// In-memory mock for `ClinicalNoteRepository` (author + subject sides).
#[derive(Default)]
pub struct MockClinicalNoteRepository {
    rows: Mutex<Vec<ClinicalNote>>,
    fail_deletes: FailureSwitch,
}

impl MockClinicalNoteRepository {
    /// Make deletes fail for the given user (or `None` to clear).
    pub fn fail_deletes_for(&self, user_id: Option<&str>) {
        self.fail_deletes.target(user_id);
    }

    pub fn len(&self) -> usize {
        self.rows.lock().expect("rows lock").len()
    }
}

#[async_trait]
impl ClinicalNoteRepository for MockClinicalNoteRepository {
    async fn insert(&self, note: ClinicalNote) -> DomainResult<()> {
        self.rows.lock().expect("rows lock").push(note);
        Ok(())
    }

    async fn count_for_user(&self, user_id: &str) -> DomainResult<usize> {
        Ok(self
            .rows
            .lock()
            .expect("rows lock")
            .iter()
            .filter(|r| r.author_id == user_id || r.subject_id == user_id)
            .count())
    }

    async fn delete_for_user(&self, user_id: &str) -> DomainResult<usize> {
        self.fail_deletes.check(user_id)?;
        let mut rows = self.rows.lock().expect("rows lock");
        let before = rows.len();
        rows.retain(|r| r.author_id != user_id && r.subject_id != user_id);
        Ok(before - rows.len())
    }
}

/// In-memory mock for `CareLinkRepository` (both directions).
#[derive(Default)]
pub struct MockCareLinkRepository {
    rows: Mutex<Vec<CareLink>>,
    fail_deletes: FailureSwitch,
}

impl MockCareLinkRepository {
    /// Make deletes fail for the given user (or `None` to clear).
    pub fn fail_deletes_for(&self, user_id: Option<&str>) {
        self.fail_deletes.target(user_id);
    }

    pub fn len(&self) -> usize {
        self.rows.lock().expect("rows lock").len()
    }
}

#[async_trait]
impl CareLinkRepository for MockCareLinkRepository {
    async fn insert(&self, link: CareLink) -> DomainResult<()> {
        self.rows.lock().expect("rows lock").push(link);
        Ok(())
    }

    async fn count_for_user(&self, user_id: &str) -> DomainResult<usize> {
        Ok(self
            .rows
            .lock()
            .expect("rows lock")
            .iter()
            .filter(|r| r.patient_id == user_id || r.caregiver_id == user_id)
            .count())
    }

    async fn delete_for_user(&self, user_id: &str) -> DomainResult<usize> {
        self.fail_deletes.check(user_id)?;
        let mut rows = self.rows.lock().expect("rows lock");
        let before = rows.len();
        rows.retain(|r| r.patient_id != user_id && r.caregiver_id != user_id);
        Ok(before - rows.len())
    }

    async fn has_active_links(&self, caregiver_id: &str) -> DomainResult<bool> {
        Ok(self
            .rows
            .lock()
            .expect("rows lock")
            .iter()
            .any(|r| r.caregiver_id == caregiver_id))
    }
}

/// Owner-or-admin policy with a fixed admin set.
#[derive(Default)]
pub struct MockAccessPolicy {
    admins: Mutex<HashSet<String>>,
}

impl MockAccessPolicy {
    pub fn grant_admin(&self, id: &str) {
        self.admins.lock().expect("admin lock").insert(id.to_string());
    }
}

#[async_trait]
impl AccessPolicy for MockAccessPolicy {
    async fn is_owner_or_admin(&self, caller_id: &str, target_id: &str) -> DomainResult<bool> {
        Ok(caller_id == target_id || self.admins.lock().expect("admin lock").contains(caller_id))
    }
}
