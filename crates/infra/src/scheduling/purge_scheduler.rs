//! Periodic purge scheduler
//!
//! Drives `PurgeService::run_once` on a fixed interval with explicit
//! lifecycle management: join handles are tracked, cancellation is explicit,
//! and stop waits for the background task with a timeout. A manual
//! `run_now` serves the admin trigger and returns the batch summary.

use std::sync::Arc;
use std::time::Duration;

use haven_core::PurgeService;
use haven_domain::{LifecycleConfig, PurgeSummary};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use super::error::{SchedulerError, SchedulerResult};

/// Type alias for task handle to avoid complexity warnings
type TaskHandle = Arc<Mutex<Option<JoinHandle<()>>>>;

/// Configuration for the purge scheduler
#[derive(Debug, Clone)]
pub struct PurgeSchedulerConfig {
    /// Whether the periodic loop runs at all; `run_now` works regardless
    pub enabled: bool,
    /// Interval between purge runs
    pub interval: Duration,
    /// Timeout for awaiting the background task on stop
    pub stop_timeout: Duration,
}

impl Default for PurgeSchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval: Duration::from_secs(
                haven_domain::constants::DEFAULT_PURGE_INTERVAL_SECS,
            ),
            stop_timeout: Duration::from_secs(5),
        }
    }
}

impl From<&LifecycleConfig> for PurgeSchedulerConfig {
    fn from(config: &LifecycleConfig) -> Self {
        Self {
            enabled: config.purge_enabled,
            interval: Duration::from_secs(config.purge_interval_secs),
            ..Self::default()
        }
    }
}

/// Background purge scheduler with lifecycle management
pub struct PurgeScheduler {
    service: Arc<PurgeService>,
    config: PurgeSchedulerConfig,
    cancellation_token: CancellationToken,
    task_handle: TaskHandle,
}

impl PurgeScheduler {
    /// Create a new scheduler around the purge service.
    pub fn new(service: Arc<PurgeService>, config: PurgeSchedulerConfig) -> Self {
        Self {
            service,
            config,
            cancellation_token: CancellationToken::new(),
            task_handle: Arc::new(Mutex::new(None)),
        }
    }

    /// Start the scheduler, spawning the background loop.
    #[instrument(skip(self))]
    pub async fn start(&mut self) -> SchedulerResult<()> {
        if !self.config.enabled {
            info!("purge scheduler disabled by configuration; not starting");
            return Ok(());
        }
        if self.is_running().await {
            return Err(SchedulerError::AlreadyRunning);
        }

        info!(interval_secs = self.config.interval.as_secs(), "starting purge scheduler");

        // Fresh token so the scheduler can be restarted after a stop
        self.cancellation_token = CancellationToken::new();

        let service = Arc::clone(&self.service);
        let interval = self.config.interval;
        let cancel = self.cancellation_token.clone();

        let handle = tokio::spawn(async move {
            Self::purge_loop(service, interval, cancel).await;
        });

        *self.task_handle.lock().await = Some(handle);

        info!("purge scheduler started");
        Ok(())
    }

    /// Stop the scheduler gracefully.
    #[instrument(skip(self))]
    pub async fn stop(&mut self) -> SchedulerResult<()> {
        if !self.is_running().await {
            return Err(SchedulerError::NotRunning);
        }

        info!("stopping purge scheduler");

        self.cancellation_token.cancel();

        if let Some(handle) = self.task_handle.lock().await.take() {
            match tokio::time::timeout(self.config.stop_timeout, handle).await {
                Ok(Ok(())) => {}
                Ok(Err(err)) => {
                    warn!(error = %err, "purge scheduler task panicked");
                    return Err(SchedulerError::TaskJoinFailed(err.to_string()));
                }
                Err(_) => {
                    warn!("purge scheduler task did not stop within timeout");
                    return Err(SchedulerError::Timeout {
                        seconds: self.config.stop_timeout.as_secs(),
                    });
                }
            }
        }

        info!("purge scheduler stopped");
        Ok(())
    }

    /// Check whether the background loop is active.
    pub async fn is_running(&self) -> bool {
        let guard = self.task_handle.lock().await;
        guard.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    /// Run one purge pass immediately, outside the schedule.
    #[instrument(skip(self))]
    pub async fn run_now(&self) -> SchedulerResult<PurgeSummary> {
        let summary = self.service.run_once().await?;
        Ok(summary)
    }

    async fn purge_loop(
        service: Arc<PurgeService>,
        interval: Duration,
        cancel: CancellationToken,
    ) {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("purge loop cancelled");
                    break;
                }
                _ = tokio::time::sleep(interval) => {
                    match service.run_once().await {
                        Ok(summary) => {
                            debug!(
                                due = summary.due,
                                succeeded = summary.succeeded,
                                failed = summary.failed,
                                "periodic purge completed"
                            );
                        }
                        Err(err) => {
                            warn!(error = %err, "periodic purge failed");
                        }
                    }
                }
            }
        }
    }
}

/// Ensure the loop is cancelled when the scheduler is dropped
impl Drop for PurgeScheduler {
    fn drop(&mut self) {
        if !self.cancellation_token.is_cancelled() {
            warn!("PurgeScheduler dropped while running; cancelling");
            self.cancellation_token.cancel();
        }
    }
}
