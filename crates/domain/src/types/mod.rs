//! Common data types used throughout the application

pub mod audit;
pub mod profile;
pub mod purge;
pub mod records;

pub use audit::{AuditAction, AuditEntry};
pub use profile::{DeletionReceipt, LifecycleState, Profile, Role};
pub use purge::{AccountPurgeError, DeletedCounts, PurgeSummary};
pub use records::{CareLink, CheckIn, ClinicalNote, ConsentRecord, CrisisPlan};
