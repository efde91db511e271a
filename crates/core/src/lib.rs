//! # Haven Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - The deletion lifecycle state machine and business rules
//! - Port/adapter interfaces (traits)
//! - Use cases and services
//!
//! ## Architecture Principles
//! - Only depends on `haven-domain`
//! - No database or platform code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod lifecycle;

// Re-export specific items to avoid ambiguity
pub use lifecycle::ports::{
    AccessPolicy, AuditLogRepository, CareLinkRepository, CheckInRepository,
    ClinicalNoteRepository, ConsentRepository, CrisisPlanRepository, ProfileRepository,
};
pub use lifecycle::purge::PurgeService;
pub use lifecycle::AccountLifecycleService;
