//! Metric fetcher: one provider request turned into one outcome.

use std::sync::Arc;

use log::{debug, info, warn};
use tokio::time::Instant;

use cryptorank_market_data::{RankingRequest, RankingsProvider};

use super::model::{MetricOutcome, RankedEntry};
use crate::metrics::{format_for_metric, MetricRegistry};

/// Fetches a single metric's ranked list and formats it.
///
/// Never fails: every provider error becomes a failed [`MetricOutcome`]
/// carrying the error text and the time spent. Exactly one attempt per call.
#[derive(Clone)]
pub struct MetricFetcher {
    provider: Arc<dyn RankingsProvider>,
    registry: Arc<MetricRegistry>,
}

impl MetricFetcher {
    pub fn new(provider: Arc<dyn RankingsProvider>, registry: Arc<MetricRegistry>) -> Self {
        Self { provider, registry }
    }

    pub fn registry(&self) -> &Arc<MetricRegistry> {
        &self.registry
    }

    pub async fn fetch(&self, metric_key: &str, limit: usize) -> MetricOutcome {
        let Ok(descriptor) = self.registry.describe(metric_key) else {
            warn!("Skipping unknown metric '{}'", metric_key);
            return MetricOutcome::unknown_metric(metric_key);
        };

        debug!(
            "Fetching metric '{}' (limit {}) from {}",
            metric_key,
            limit,
            self.provider.id()
        );

        let started = Instant::now();
        let request = RankingRequest::new(metric_key, limit);
        let result = self.provider.list_coins(&request).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match result {
            Ok(coins) => {
                let entries: Vec<RankedEntry> = coins
                    .iter()
                    .map(|coin| {
                        RankedEntry::new(
                            coin.name.clone(),
                            coin.symbol.clone(),
                            format_for_metric(coin, metric_key, &self.registry),
                            metric_key,
                        )
                    })
                    .collect();

                info!(
                    "Fetched metric '{}': {} items in {}ms",
                    metric_key,
                    entries.len(),
                    elapsed_ms
                );
                MetricOutcome::success(descriptor, entries, elapsed_ms)
            }
            Err(e) => {
                warn!("Metric '{}' failed after {}ms: {}", metric_key, elapsed_ms, e);
                MetricOutcome::failure(descriptor, e.to_string(), elapsed_ms)
            }
        }
    }
}
