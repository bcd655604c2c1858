//! Background scheduler for periodic snapshot runs.
//!
//! Fixed 5-minute cadence; the first tick fires immediately so a snapshot
//! exists shortly after boot.

use std::sync::Arc;

use cryptorank_core::constants::SCHEDULE_INTERVAL;
use cryptorank_core::{Error as CoreError, TriggerSource};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::main_lib::AppState;

/// Starts the background snapshot scheduler.
pub fn start_snapshot_scheduler(state: Arc<AppState>) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            "Snapshot scheduler started ({}-minute interval)",
            SCHEDULE_INTERVAL.as_secs() / 60
        );

        let mut ticker = interval(SCHEDULE_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            run_scheduled_snapshot(&state).await;
        }
    })
}

/// Runs a single scheduled pipeline run.
async fn run_scheduled_snapshot(state: &Arc<AppState>) {
    debug!("Scheduler tick");

    match state.pipeline.run(TriggerSource::Scheduled).await {
        Ok(report) => info!(
            "Scheduled snapshot run: {} ok, {} failed, published={}",
            report.successful_fetches, report.failed_fetches, report.published
        ),
        Err(CoreError::RunInProgress) => {
            info!("Scheduled snapshot run skipped: previous run still in progress");
        }
        Err(e) => warn!("Scheduled snapshot run failed: {}", e),
    }
}
