//! Shared fixtures for core lifecycle tests

pub mod repositories;

use std::sync::Arc;

use chrono::Utc;
use haven_core::{
    AccessPolicy, AuditLogRepository, CareLinkRepository, CheckInRepository,
    ClinicalNoteRepository, ConsentRepository, CrisisPlanRepository, ProfileRepository,
};
use haven_domain::{LifecycleConfig, Profile, Role};

use self::repositories::{
    MockAccessPolicy, MockAuditLog, MockCareLinkRepository, MockCheckInRepository,
    MockClinicalNoteRepository, MockConsentRepository, MockCrisisPlanRepository,
    MockProfileRepository,
};

/// Full set of mock collaborators wired to one shared audit sink.
pub struct World {
    pub profiles: Arc<MockProfileRepository>,
    pub audit: Arc<MockAuditLog>,
    pub check_ins: Arc<MockCheckInRepository>,
    pub crisis_plans: Arc<MockCrisisPlanRepository>,
    pub clinical_notes: Arc<MockClinicalNoteRepository>,
    pub care_links: Arc<MockCareLinkRepository>,
    pub consents: Arc<MockConsentRepository>,
    pub access: Arc<MockAccessPolicy>,
}

impl World {
    pub fn new() -> Self {
        let audit = Arc::new(MockAuditLog::default());
        Self {
            profiles: Arc::new(MockProfileRepository::new(Arc::clone(&audit))),
            check_ins: Arc::new(MockCheckInRepository::default()),
            crisis_plans: Arc::new(MockCrisisPlanRepository::default()),
            clinical_notes: Arc::new(MockClinicalNoteRepository::default()),
            care_links: Arc::new(MockCareLinkRepository::default()),
            consents: Arc::new(MockConsentRepository::default()),
            access: Arc::new(MockAccessPolicy::default()),
            audit,
        }
    }

    pub fn lifecycle_service(&self, config: LifecycleConfig) -> haven_core::AccountLifecycleService {
        haven_core::AccountLifecycleService::new(
            Arc::clone(&self.profiles) as Arc<dyn ProfileRepository>,
            Arc::clone(&self.care_links) as Arc<dyn CareLinkRepository>,
            Arc::clone(&self.audit) as Arc<dyn AuditLogRepository>,
            Arc::clone(&self.access) as Arc<dyn AccessPolicy>,
            config,
        )
    }

    pub fn purge_service(&self) -> haven_core::PurgeService {
        haven_core::PurgeService::new(
            Arc::clone(&self.profiles) as Arc<dyn ProfileRepository>,
            Arc::clone(&self.check_ins) as Arc<dyn CheckInRepository>,
            Arc::clone(&self.crisis_plans) as Arc<dyn CrisisPlanRepository>,
            Arc::clone(&self.clinical_notes) as Arc<dyn ClinicalNoteRepository>,
            Arc::clone(&self.care_links) as Arc<dyn CareLinkRepository>,
            Arc::clone(&self.consents) as Arc<dyn ConsentRepository>,
        )
    }
}

/// Build an active profile with sensible defaults.
pub fn active_profile(id: &str, role: Role) -> Profile {
    let now = Utc::now().timestamp();
    Profile {
        id: id.into(),
        role,
        email: format!("{id}@example.com"),
        display_name: None,
        deletion_scheduled_at: None,
        deletion_token: None,
        deleted_at: None,
        created_at: now,
        updated_at: now,
    }
}
