//! Background task that keeps the snapshot store fresh.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::scrape::Scraper;

/// Default pause between two refresh cycles.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(15 * 60);

/// Runs the orchestrator immediately and then once per interval, forever.
///
/// Scheduling is fixed-delay: the interval is measured from the end of one
/// cycle to the start of the next, so cycles never overlap.
pub struct RefreshScheduler {
    scraper: Arc<Scraper>,
    interval: Duration,
}

impl RefreshScheduler {
    /// Create a scheduler for `scraper`.
    #[must_use]
    pub fn new(scraper: Arc<Scraper>, interval: Duration) -> Self {
        Self { scraper, interval }
    }

    /// Spawn the refresh loop on its own task.
    ///
    /// The loop ends once `shutdown` holds `true` or its sender is dropped.
    /// A failed cycle is logged and never stops the loop.
    #[must_use]
    pub fn spawn(self, shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }

    async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!(interval_secs = self.interval.as_secs(), "refresh scheduler started");
        let mut cycle: u64 = 0;

        while !*shutdown.borrow() {
            cycle += 1;
            match self.scraper.run_cycle().await {
                Ok(_) => info!(cycle, "refresh cycle succeeded"),
                Err(err) => error!(cycle, error = %err, "refresh cycle failed"),
            }

            debug!(cycle, "sleeping until next refresh");
            tokio::select! {
                () = tokio::time::sleep(self.interval) => {}
                // Only `true` or a dropped sender cuts the pause short.
                _ = shutdown.wait_for(|stop| *stop) => break,
            }
        }

        info!(cycles = cycle, "refresh scheduler stopped");
    }
}
