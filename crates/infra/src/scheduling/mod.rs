//! Background scheduling for the purge job

mod error;
mod purge_scheduler;

pub use error::{SchedulerError, SchedulerResult};
pub use purge_scheduler::{PurgeScheduler, PurgeSchedulerConfig};
