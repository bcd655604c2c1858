//! Fetch orchestrator: runs every registered metric in fixed-size batches.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::Utc;
use log::{debug, info, warn};
use tokio::task::JoinSet;
use tokio::time::Instant;

use super::fetcher::MetricFetcher;
use super::model::MetricOutcome;
use crate::constants::{BATCH_PAUSE, BATCH_SIZE};
use crate::errors::{Error, Result};
use crate::snapshot::Snapshot;

/// Rate-limiting policy: how many fetches run together and how long to wait
/// between batches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchPolicy {
    pub batch_size: usize,
    pub pause: Duration,
}

impl Default for BatchPolicy {
    fn default() -> Self {
        Self {
            batch_size: BATCH_SIZE,
            pause: BATCH_PAUSE,
        }
    }
}

/// Runs every registered metric through the fetcher and assembles a
/// [`Snapshot`].
#[derive(Clone)]
pub struct FetchOrchestrator {
    fetcher: MetricFetcher,
    policy: BatchPolicy,
}

impl FetchOrchestrator {
    pub fn new(fetcher: MetricFetcher) -> Self {
        Self::with_policy(fetcher, BatchPolicy::default())
    }

    pub fn with_policy(fetcher: MetricFetcher, policy: BatchPolicy) -> Self {
        Self { fetcher, policy }
    }

    pub fn policy(&self) -> BatchPolicy {
        self.policy
    }

    /// Fetch every registered metric, `metric_limit` items each.
    ///
    /// Per-metric failures end up in the snapshot as failed outcomes. The
    /// only error is an empty registry.
    pub async fn run_all(&self, metric_limit: usize) -> Result<Snapshot> {
        let registry = self.fetcher.registry().clone();
        if registry.is_empty() {
            return Err(Error::Configuration(
                "metric registry is empty".to_string(),
            ));
        }

        let captured_at = Utc::now();
        let started = Instant::now();
        let keys: Vec<String> = registry.keys().map(str::to_string).collect();
        let batches: Vec<&[String]> = keys.chunks(self.policy.batch_size.max(1)).collect();
        let batch_count = batches.len();

        info!(
            "Fetching {} metrics in {} batches of up to {}",
            keys.len(),
            batch_count,
            self.policy.batch_size
        );

        let mut outcomes: BTreeMap<String, MetricOutcome> = BTreeMap::new();

        for (index, batch) in batches.into_iter().enumerate() {
            debug!("Batch {}/{}: {}", index + 1, batch_count, batch.join(", "));

            let mut tasks = JoinSet::new();
            for key in batch {
                let fetcher = self.fetcher.clone();
                let key = key.clone();
                tasks.spawn(async move {
                    let outcome = fetcher.fetch(&key, metric_limit).await;
                    (key, outcome)
                });
            }

            // Outcomes come back over the join handles; this loop is the only
            // writer of the map.
            while let Some(joined) = tasks.join_next().await {
                match joined {
                    Ok((key, outcome)) => {
                        outcomes.insert(key, outcome);
                    }
                    Err(e) => warn!("Metric fetch task did not complete: {}", e),
                }
            }

            for key in batch {
                if !outcomes.contains_key(key) {
                    let outcome = match registry.describe(key) {
                        Ok(descriptor) => MetricOutcome::failure(descriptor, "fetch task aborted", 0),
                        Err(_) => MetricOutcome::unknown_metric(key),
                    };
                    outcomes.insert(key.clone(), outcome);
                }
            }

            if index + 1 < batch_count {
                debug!("Pausing {:?} before next batch", self.policy.pause);
                tokio::time::sleep(self.policy.pause).await;
            }
        }

        let total_duration_ms = started.elapsed().as_millis() as u64;
        let snapshot = Snapshot::assemble(
            captured_at,
            registry.len(),
            outcomes,
            total_duration_ms,
            Utc::now(),
        );

        info!(
            "Fetch run complete: {} succeeded, {} failed in {}ms",
            snapshot.stats.success_count, snapshot.stats.failure_count, total_duration_ms
        );

        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{MetricDescriptor, MetricRegistry, PriorityTier, SemanticType};
    use async_trait::async_trait;
    use cryptorank_market_data::{MarketDataError, ProviderCoin, RankingRequest, RankingsProvider};
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    /// Provider that records when each sort key was requested.
    struct RecordingProvider {
        started: Instant,
        delay: Duration,
        failing: HashSet<&'static str>,
        panicking: HashSet<&'static str>,
        calls: Mutex<Vec<(String, Duration)>>,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    impl RecordingProvider {
        fn new() -> Self {
            Self {
                started: Instant::now(),
                delay: Duration::ZERO,
                failing: HashSet::new(),
                panicking: HashSet::new(),
                calls: Mutex::new(Vec::new()),
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> Vec<(String, Duration)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl RankingsProvider for RecordingProvider {
        fn id(&self) -> &'static str {
            "RECORDING"
        }

        async fn list_coins(
            &self,
            request: &RankingRequest,
        ) -> std::result::Result<Vec<ProviderCoin>, MarketDataError> {
            self.calls
                .lock()
                .unwrap()
                .push((request.sort.clone(), self.started.elapsed()));

            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if self.panicking.contains(request.sort.as_str()) {
                panic!("provider blew up");
            }
            if self.failing.contains(request.sort.as_str()) {
                return Err(MarketDataError::Timeout {
                    provider: "RECORDING".to_string(),
                    timeout_secs: 30,
                });
            }

            let mut coin = ProviderCoin::new("Bitcoin", "BTC");
            coin.market_cap = 2_115_599_321_207.0;
            coin.price = 106_543.21;
            Ok(vec![coin])
        }
    }

    fn orchestrator(provider: Arc<RecordingProvider>, registry: MetricRegistry) -> FetchOrchestrator {
        FetchOrchestrator::new(MetricFetcher::new(provider, Arc::new(registry)))
    }

    #[tokio::test(start_paused = true)]
    async fn test_every_metric_present_and_batches_paused() {
        let provider = Arc::new(RecordingProvider::new());
        let orchestrator = orchestrator(provider.clone(), MetricRegistry::standard());

        let started = Instant::now();
        let snapshot = orchestrator.run_all(10).await.unwrap();

        assert_eq!(snapshot.metric_count, 11);
        assert_eq!(snapshot.outcomes_by_key.len(), 11);
        assert_eq!(snapshot.stats.success_count, 11);
        assert_eq!(snapshot.stats.failure_count, 0);

        // 11 metrics in batches of 5: two pauses, none after the last batch
        assert_eq!(started.elapsed(), Duration::from_secs(2));

        let calls = provider.calls();
        assert_eq!(calls.len(), 11);
        let offsets: Vec<u64> = {
            let mut by_key = calls.clone();
            by_key.sort_by(|a, b| a.0.cmp(&b.0));
            by_key.iter().map(|(_, at)| at.as_secs()).collect()
        };
        assert_eq!(offsets, vec![0, 0, 0, 0, 0, 1, 1, 1, 1, 1, 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_batch_has_no_pause() {
        let provider = Arc::new(RecordingProvider::new());
        let registry = MetricRegistry::from_descriptors(
            MetricRegistry::standard().list_metrics()[..5].to_vec(),
        )
        .unwrap();
        let orchestrator = orchestrator(provider, registry);

        let started = Instant::now();
        orchestrator.run_all(10).await.unwrap();
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrency_bounded_by_batch_size() {
        let mut provider = RecordingProvider::new();
        provider.delay = Duration::from_millis(500);
        let provider = Arc::new(provider);
        let orchestrator = orchestrator(provider.clone(), MetricRegistry::standard());

        orchestrator.run_all(10).await.unwrap();

        assert_eq!(provider.max_in_flight.load(Ordering::SeqCst), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_partial_failure_is_data() {
        let mut provider = RecordingProvider::new();
        provider.failing.insert("price");
        let provider = Arc::new(provider);

        let registry = MetricRegistry::from_descriptors(vec![
            MetricDescriptor::new(
                "market_cap",
                "Market Cap",
                PriorityTier::High,
                "Market Capitalization",
                SemanticType::CurrencyLarge,
            ),
            MetricDescriptor::new(
                "price",
                "Price",
                PriorityTier::High,
                "Current USD Price",
                SemanticType::CurrencyPrice,
            ),
        ])
        .unwrap();

        let snapshot = orchestrator(provider, registry).run_all(10).await.unwrap();

        assert_eq!(snapshot.metric_count, 2);
        let market_cap = snapshot.outcome("market_cap").unwrap();
        assert!(market_cap.succeeded());
        assert_eq!(market_cap.all_entries().len(), 1);
        assert_eq!(market_cap.all_entries()[0].entity_name, "Bitcoin");
        assert_eq!(market_cap.all_entries()[0].formatted_value, "$2.1T");

        let price = snapshot.outcome("price").unwrap();
        assert!(!price.succeeded());
        assert!(price.error_message().unwrap().contains("timed out"));

        assert_eq!(snapshot.stats.success_count, 1);
        assert_eq!(snapshot.stats.failure_count, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_panicking_fetch_still_yields_outcome() {
        let mut provider = RecordingProvider::new();
        provider.panicking.insert("alt_rank");
        let orchestrator = orchestrator(Arc::new(provider), MetricRegistry::standard());

        let snapshot = orchestrator.run_all(10).await.unwrap();

        assert_eq!(snapshot.outcomes_by_key.len(), 11);
        let alt_rank = snapshot.outcome("alt_rank").unwrap();
        assert_eq!(alt_rank.error_message(), Some("fetch task aborted"));
        assert_eq!(snapshot.stats.failure_count, 1);
        assert!(snapshot.ensure_complete().is_ok());
    }

    #[tokio::test]
    async fn test_custom_policy() {
        let provider = Arc::new(RecordingProvider::new());
        let fetcher = MetricFetcher::new(provider.clone(), Arc::new(MetricRegistry::standard()));
        let orchestrator = FetchOrchestrator::with_policy(
            fetcher,
            BatchPolicy {
                batch_size: 11,
                pause: Duration::from_secs(60),
            },
        );

        let snapshot = orchestrator.run_all(3).await.unwrap();
        assert_eq!(snapshot.outcomes_by_key.len(), 11);
        assert_eq!(provider.calls().len(), 11);
    }
}
