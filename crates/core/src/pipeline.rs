//! Snapshot pipeline: what a trigger invokes.
//!
//! One run = fetch every metric, then publish the resulting snapshot. At most
//! one run is in flight per pipeline; a trigger arriving meanwhile is refused
//! with [`Error::RunInProgress`] rather than queued.

use std::sync::Arc;

use log::{error, info};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, OwnedMutexGuard};

use cryptorank_market_data::RankingsProvider;

use crate::constants::MAX_METRIC_LIMIT;
use crate::errors::{Error, Result};
use crate::metrics::MetricRegistry;
use crate::rankings::{FetchOrchestrator, MetricFetcher};
use crate::snapshot::{SnapshotPublisher, SnapshotReader, SnapshotStore};

/// What started a run. Only affects logging and the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerSource {
    Scheduled,
    Manual,
}

impl std::fmt::Display for TriggerSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TriggerSource::Scheduled => write!(f, "scheduled"),
            TriggerSource::Manual => write!(f, "manual"),
        }
    }
}

/// Summary of one completed run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub trigger: TriggerSource,
    pub total_metrics: usize,
    pub successful_fetches: usize,
    pub failed_fetches: usize,
    pub total_duration_ms: u64,
    /// False when the store rejected the write; the previous snapshot stays.
    pub published: bool,
}

/// Exclusive right to run the pipeline, released on drop.
pub struct RunGuard {
    _guard: OwnedMutexGuard<()>,
}

pub struct SnapshotPipeline {
    orchestrator: FetchOrchestrator,
    publisher: SnapshotPublisher,
    store: Arc<dyn SnapshotStore>,
    registry: Arc<MetricRegistry>,
    metric_limit: usize,
    run_lock: Arc<Mutex<()>>,
}

impl SnapshotPipeline {
    /// Wire a pipeline with the default batch policy and snapshot key.
    pub fn new(
        provider: Arc<dyn RankingsProvider>,
        registry: Arc<MetricRegistry>,
        store: Arc<dyn SnapshotStore>,
        metric_limit: usize,
    ) -> Result<Self> {
        let orchestrator = FetchOrchestrator::new(MetricFetcher::new(provider, registry.clone()));
        Self::from_parts(orchestrator, registry, store, metric_limit)
    }

    pub fn from_parts(
        orchestrator: FetchOrchestrator,
        registry: Arc<MetricRegistry>,
        store: Arc<dyn SnapshotStore>,
        metric_limit: usize,
    ) -> Result<Self> {
        if registry.is_empty() {
            return Err(Error::Configuration("metric registry is empty".to_string()));
        }
        if metric_limit == 0 || metric_limit > MAX_METRIC_LIMIT {
            return Err(Error::Configuration(format!(
                "metric limit must be between 1 and {}, got {}",
                MAX_METRIC_LIMIT, metric_limit
            )));
        }

        Ok(Self {
            orchestrator,
            publisher: SnapshotPublisher::new(store.clone()),
            store,
            registry,
            metric_limit,
            run_lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn registry(&self) -> &Arc<MetricRegistry> {
        &self.registry
    }

    pub fn store(&self) -> &Arc<dyn SnapshotStore> {
        &self.store
    }

    pub fn metric_limit(&self) -> usize {
        self.metric_limit
    }

    /// Reader over the same store this pipeline publishes to.
    pub fn reader(&self) -> SnapshotReader {
        SnapshotReader::new(self.store.clone())
    }

    pub fn is_running(&self) -> bool {
        self.run_lock.try_lock().is_err()
    }

    /// Claim the pipeline without waiting.
    pub fn try_acquire(&self) -> Result<RunGuard> {
        self.run_lock
            .clone()
            .try_lock_owned()
            .map(|guard| RunGuard { _guard: guard })
            .map_err(|_| Error::RunInProgress)
    }

    /// Run once, unless another run is in flight.
    pub async fn run(&self, trigger: TriggerSource) -> Result<RunReport> {
        let guard = self.try_acquire()?;
        self.run_with(guard, trigger).await
    }

    /// Run once under a guard obtained from [`try_acquire`](Self::try_acquire).
    pub async fn run_with(&self, guard: RunGuard, trigger: TriggerSource) -> Result<RunReport> {
        info!("Starting {} pipeline run", trigger);

        let snapshot = self.orchestrator.run_all(self.metric_limit).await?;

        let published = match self.publisher.publish(&snapshot).await {
            Ok(()) => true,
            Err(e) => {
                error!("{} run finished but was not published: {}", trigger, e);
                false
            }
        };
        drop(guard);

        let report = RunReport {
            trigger,
            total_metrics: snapshot.metric_count,
            successful_fetches: snapshot.stats.success_count,
            failed_fetches: snapshot.stats.failure_count,
            total_duration_ms: snapshot.stats.total_duration_ms,
            published,
        };

        info!(
            "Finished {} run: {}/{} metrics succeeded in {}ms",
            trigger, report.successful_fetches, report.total_metrics, report.total_duration_ms
        );

        Ok(report)
    }
}
