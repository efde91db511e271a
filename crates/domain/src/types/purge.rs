//! Purge job result types

use serde::{Deserialize, Serialize};

/// Per-table delete counts for one account's cascade
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletedCounts {
    pub check_ins: usize,
    pub crisis_plans: usize,
    pub clinical_notes: usize,
    pub care_links: usize,
    pub consents: usize,
}

impl DeletedCounts {
    /// Total records removed across all dependent stores.
    pub fn total(&self) -> usize {
        self.check_ins + self.crisis_plans + self.clinical_notes + self.care_links + self.consents
    }
}

/// One failed account in a purge run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountPurgeError {
    pub profile_id: String,
    pub message: String,
}

/// Summary of one purge run, returned to the scheduler trigger and the
/// manual admin trigger for operational alerting.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PurgeSummary {
    /// Accounts whose grace period had expired at the start of the run
    pub due: usize,
    /// Accounts fully cascaded and marked deleted
    pub succeeded: usize,
    /// Accounts whose cascade failed; they stay due and retry next run
    pub failed: usize,
    /// Accounts that lost their pending state mid-run (undo or concurrent
    /// run won); no terminal mark was written
    pub skipped: usize,
    pub errors: Vec<AccountPurgeError>,
    pub elapsed_ms: u64,
}
