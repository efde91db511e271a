//! # Haven Infrastructure
//!
//! Infrastructure implementations of the core lifecycle ports.
//!
//! This crate contains:
//! - SQLite-backed repository implementations
//! - The background purge scheduler
//! - Configuration loading (environment variables or file)
//! - The static access policy built from configuration
//!
//! ## Architecture
//! - Implements traits defined in `haven-core`
//! - Depends on `haven-domain` and `haven-core`
//! - Contains all "impure" code (I/O, clocks, process environment)

pub mod access;
pub mod config;
pub mod database;
pub mod errors;
pub mod scheduling;

pub use access::StaticAccessPolicy;
pub use database::DbManager;
