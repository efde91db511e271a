//! Account deletion lifecycle - core business logic
//!
//! The single lifecycle this crate implements: a profile moves from active
//! to pending-deletion on request, back to active on a token-proven undo,
//! and to terminally deleted once the grace period expires and the purge
//! cascade completes.

pub mod ports;
pub mod purge;
pub mod service;
mod token;

pub use service::AccountLifecycleService;
