//! Background worker running placement and reclaim passes on their own schedules

use crate::{
    BasePathLocks, Config, JanitorError, LifecycleMetrics, PlacementEngine, PlacementReport,
    ReclaimReport, RetentionEvictor, SpaceProbe, StatfsProbe,
};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::time::{sleep, Duration};
use tokio_util::sync::CancellationToken;

/// Background worker that runs both passes on independent fixed intervals
///
/// Each loop runs a pass, then sleeps its full interval. Passes run on the
/// blocking thread pool; cancellation is observed between passes and, inside a
/// pass, between files and between evictions.
///
/// # Examples
///
/// ```no_run
/// use dayfile_janitor::{Config, JanitorWorker};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = Config::from_file("dayfile.toml")?;
///     let worker = JanitorWorker::new(config);
///
///     // Run indefinitely (until Ctrl+C)
///     worker.run_until_ctrl_c().await?;
///     Ok(())
/// }
/// ```
pub struct JanitorWorker<P: SpaceProbe + 'static = StatfsProbe> {
    placement: Arc<PlacementEngine>,
    evictor: Arc<RetentionEvictor<P>>,
    organize_interval: Duration,
    reclaim_interval: Duration,
    metrics: Mutex<LifecycleMetrics>,
}

impl JanitorWorker<StatfsProbe> {
    /// Create a worker that measures real filesystems
    pub fn new(config: Config) -> Self {
        Self::with_probe(config, StatfsProbe)
    }
}

impl<P: SpaceProbe + 'static> JanitorWorker<P> {
    /// Create a worker with a custom free-space source
    pub fn with_probe(config: Config, probe: P) -> Self {
        let organize_interval = config.organize_interval();
        let reclaim_interval = config.reclaim_interval();
        let config = Arc::new(config);
        let locks = Arc::new(BasePathLocks::new(config.base_paths()));

        Self {
            placement: Arc::new(PlacementEngine::new(Arc::clone(&config), Arc::clone(&locks))),
            evictor: Arc::new(RetentionEvictor::with_probe(config, locks, probe)),
            organize_interval,
            reclaim_interval,
            metrics: Mutex::new(LifecycleMetrics::new()),
        }
    }

    /// Run both loops until `cancel` fires
    ///
    /// Pass failures are logged and the loop waits for its next tick; they never
    /// stop the worker.
    pub async fn run(&self, cancel: CancellationToken) -> Result<(), JanitorError> {
        tracing::info!(
            "Janitor worker started (placement every {:?}, reclaim every {:?})",
            self.organize_interval,
            self.reclaim_interval
        );

        tokio::join!(self.organize_loop(&cancel), self.reclaim_loop(&cancel));

        tracing::info!("Janitor stopped. Final metrics:\n{}", self.metrics().summary());
        Ok(())
    }

    /// Run until a shutdown signal (Ctrl+C) is received
    pub async fn run_until_ctrl_c(&self) -> Result<(), JanitorError> {
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Shutdown signal received, stopping janitor");
            }
            trigger.cancel();
        });

        self.run(cancel).await
    }

    /// Run one placement pass on the blocking pool and record it
    pub async fn organize_once(&self, cancel: &CancellationToken) -> Result<PlacementReport, JanitorError> {
        let engine = Arc::clone(&self.placement);
        let token = cancel.clone();
        let result = tokio::task::spawn_blocking(move || engine.organize_until(&token))
            .await
            .map_err(|e| JanitorError::Worker(e.to_string()))?;

        let mut metrics = self.lock_metrics();
        match &result {
            Ok(report) => metrics.record_placement(report),
            Err(_) => metrics.record_failure(),
        }
        result
    }

    /// Run one reclaim pass on the blocking pool and record it
    pub async fn reclaim_once(&self, cancel: &CancellationToken) -> Result<ReclaimReport, JanitorError> {
        let evictor = Arc::clone(&self.evictor);
        let token = cancel.clone();
        let result = tokio::task::spawn_blocking(move || evictor.reclaim_until(&token))
            .await
            .map_err(|e| JanitorError::Worker(e.to_string()))?;

        let mut metrics = self.lock_metrics();
        match &result {
            Ok(report) => metrics.record_reclaim(report),
            Err(_) => metrics.record_failure(),
        }
        result
    }

    async fn organize_loop(&self, cancel: &CancellationToken) {
        while !cancel.is_cancelled() {
            tracing::debug!("Starting placement pass");
            match self.organize_once(cancel).await {
                Ok(report) => tracing::info!(
                    "Placement pass completed: {} moved, {} deleted, {} skipped",
                    report.moved,
                    report.deleted,
                    report.skipped
                ),
                Err(e) => tracing::error!("Placement pass failed: {}", e),
            }

            if !sleep_unless_cancelled(self.organize_interval, cancel).await {
                break;
            }
        }
    }

    async fn reclaim_loop(&self, cancel: &CancellationToken) {
        while !cancel.is_cancelled() {
            tracing::debug!("Starting reclaim pass");
            match self.reclaim_once(cancel).await {
                Ok(report) => tracing::info!(
                    "Reclaim pass completed: {} directories evicted, {} ancestors removed",
                    report.directories_evicted,
                    report.ancestors_removed
                ),
                Err(e) => tracing::error!("Reclaim pass failed: {}", e),
            }

            if !sleep_unless_cancelled(self.reclaim_interval, cancel).await {
                break;
            }
        }
    }

    /// Snapshot of the metrics accumulated so far
    pub fn metrics(&self) -> LifecycleMetrics {
        self.lock_metrics().clone()
    }

    /// Reset the accumulated metrics
    pub fn reset_metrics(&self) {
        self.lock_metrics().reset();
    }

    fn lock_metrics(&self) -> std::sync::MutexGuard<'_, LifecycleMetrics> {
        self.metrics.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Sleep for `interval`; returns `false` if cancelled first
async fn sleep_unless_cancelled(interval: Duration, cancel: &CancellationToken) -> bool {
    tokio::select! {
        _ = cancel.cancelled() => false,
        _ = sleep(interval) => true,
    }
}
