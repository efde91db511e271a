//! Static access policy
//!
//! Owner-or-admin decision backed by the admin allow-list from
//! configuration. The set is fixed at startup; there is no mutable global
//! admin state.

use std::collections::HashSet;

use async_trait::async_trait;
use haven_core::AccessPolicy;
use haven_domain::{AccessConfig, Result};

/// Access policy built from the configured admin id list.
pub struct StaticAccessPolicy {
    admin_ids: HashSet<String>,
}

impl StaticAccessPolicy {
    /// Build the policy from configuration.
    pub fn new(config: &AccessConfig) -> Self {
        Self { admin_ids: config.admin_ids.iter().cloned().collect() }
    }
}

#[async_trait]
impl AccessPolicy for StaticAccessPolicy {
    async fn is_owner_or_admin(&self, caller_id: &str, target_id: &str) -> Result<bool> {
        Ok(caller_id == target_id || self.admin_ids.contains(caller_id))
    }
}
