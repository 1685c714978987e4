//! Periodic trailer monitoring.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::pipeline::{RunOutcome, TrailerPipeline};

/// Runs the trailer pipeline on a fixed interval.
///
/// The first run starts immediately. Each tick awaits its run, so runs never
/// overlap; ticks missed while a run is in progress are skipped.
pub struct MonitorScheduler {
    pipeline: Arc<TrailerPipeline>,
    interval: Duration,
    running: Arc<AtomicBool>,
    cancel: CancellationToken,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl MonitorScheduler {
    /// `shutdown` is the process-wide token; the scheduler uses a child of it.
    pub fn new(
        pipeline: Arc<TrailerPipeline>,
        interval: Duration,
        shutdown: &CancellationToken,
    ) -> Self {
        Self {
            pipeline,
            interval,
            running: Arc::new(AtomicBool::new(false)),
            cancel: shutdown.child_token(),
            handle: Mutex::new(None),
        }
    }

    /// Start the background loop.
    pub fn start(&self) {
        if self.running.swap(true, Ordering::SeqCst) {
            warn!("Monitor scheduler already running");
            return;
        }

        info!(
            "Starting monitor scheduler (interval: {}s)",
            self.interval.as_secs()
        );

        let pipeline = Arc::clone(&self.pipeline);
        let cancel = self.cancel.clone();
        let period = self.interval;

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        info!("Monitor scheduler received shutdown signal");
                        break;
                    }
                    _ = ticker.tick() => {
                        match pipeline.run(&cancel).await {
                            Ok(RunOutcome::Completed(report)) => info!(
                                "Scheduled run {} finished: {} downloaded, {} failed",
                                report.run_id,
                                report.downloads.succeeded,
                                report.downloads.failed
                            ),
                            Ok(_) => {}
                            Err(e) => error!("Scheduled run failed: {}", e),
                        }
                    }
                }
            }
            info!("Monitor scheduler stopped");
        });

        *self.handle.lock() = Some(handle);
    }

    /// Stop the loop and wait for it to exit.
    ///
    /// A run in progress stops starting new downloads; in-flight ones finish.
    pub async fn stop(&self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            warn!("Monitor scheduler not running");
            return;
        }

        info!("Stopping monitor scheduler");
        self.cancel.cancel();

        let handle = self.handle.lock().take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                error!("Monitor scheduler task failed: {}", e);
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MonitorConfig;
    use crate::dedup::TrailerDedupCache;
    use crate::testing::{
        fixtures, InMemoryMediaStore, MockFilesystem, MockTrailerFetcher, StaticProfileStore,
    };

    fn pipeline(fetcher: Arc<MockTrailerFetcher>) -> Arc<TrailerPipeline> {
        let media = fixtures::movie(1, "Heat", "949");
        let fs = MockFilesystem::new();
        fs.add_folder(media.folder_path.clone().unwrap());

        Arc::new(TrailerPipeline::new(
            MonitorConfig::default(),
            Arc::new(InMemoryMediaStore::with_media(vec![media])),
            Arc::new(StaticProfileStore::new(vec![fixtures::match_all_profile(
                1, "all", 0,
            )])),
            Arc::new(TrailerDedupCache::disabled()),
            Arc::new(fs),
            fetcher,
        ))
    }

    #[tokio::test]
    async fn test_first_tick_runs_immediately() {
        let fetcher = Arc::new(MockTrailerFetcher::new());
        let shutdown = CancellationToken::new();
        let scheduler =
            MonitorScheduler::new(pipeline(fetcher.clone()), Duration::from_secs(3600), &shutdown);

        scheduler.start();
        assert!(scheduler.is_running());

        for _ in 0..100 {
            if fetcher.fetch_count().await > 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(fetcher.fetch_count().await, 1);

        scheduler.stop().await;
        assert!(!scheduler.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_runs_every_interval() {
        let fetcher = Arc::new(MockTrailerFetcher::new());
        let shutdown = CancellationToken::new();
        let scheduler =
            MonitorScheduler::new(pipeline(fetcher.clone()), Duration::from_secs(60), &shutdown);

        scheduler.start();
        tokio::time::sleep(Duration::from_secs(125)).await;
        scheduler.stop().await;

        // Ticks at 0s, 60s and 120s.
        assert_eq!(fetcher.fetch_count().await, 3);
    }

    #[tokio::test]
    async fn test_parent_shutdown_stops_loop() {
        let fetcher = Arc::new(MockTrailerFetcher::new());
        let shutdown = CancellationToken::new();
        let scheduler =
            MonitorScheduler::new(pipeline(fetcher), Duration::from_secs(3600), &shutdown);

        scheduler.start();
        shutdown.cancel();
        // stop() still joins the already-exiting task.
        scheduler.stop().await;
        assert!(!scheduler.is_running());
    }
}
