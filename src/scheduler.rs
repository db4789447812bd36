//! Periodic full-cycle scheduling.
//!
//! Drives [`NewsPipeline::run`] on a fixed interval. The first cycle starts
//! immediately; cancelling the shared token stops the loop between cycles.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::pipeline::NewsPipeline;

/// Runs full pipeline cycles on a fixed interval until cancelled
pub struct PipelineScheduler {
    pipeline: Arc<NewsPipeline>,
    interval: Duration,
    cancel_token: CancellationToken,
}

impl PipelineScheduler {
    /// Create a scheduler driving the given pipeline
    pub fn new(
        pipeline: Arc<NewsPipeline>,
        interval: Duration,
        cancel_token: CancellationToken,
    ) -> Self {
        Self {
            pipeline,
            interval,
            cancel_token,
        }
    }

    /// Spawn the scheduling loop as a background task
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Run cycles until the token is cancelled
    ///
    /// The first cycle starts immediately; later cycles follow the
    /// configured interval. A cycle that overruns its interval delays the
    /// next one instead of stacking up.
    pub async fn run(self) {
        info!("Pipeline scheduler started, interval {:?}", self.interval);

        // tokio::time::interval panics on a zero period
        let period = self.interval.max(Duration::from_secs(1));
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let report = self.pipeline.run().await;
                    info!(
                        "Cycle complete: {} ingested, {} translated, {} published",
                        report.ingest.ingested,
                        report.translate.translated,
                        report.publish.published
                    );
                }
                _ = self.cancel_token.cancelled() => {
                    break;
                }
            }
        }

        info!("Pipeline scheduler stopped");
    }
}
