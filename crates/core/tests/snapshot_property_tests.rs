//! Property-based tests for run and snapshot invariants.
//!
//! Every run yields exactly one outcome per registered metric, the counts add
//! up, and a published snapshot reads back unchanged.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use cryptorank_core::metrics::MetricRegistry;
use cryptorank_core::rankings::{FetchOrchestrator, MetricFetcher};
use cryptorank_core::snapshot::{InMemorySnapshotStore, SnapshotPublisher, SnapshotReader};
use cryptorank_core::Snapshot;
use cryptorank_market_data::{MarketDataError, ProviderCoin, RankingRequest, RankingsProvider};
use proptest::prelude::*;

// =============================================================================
// Test Provider
// =============================================================================

/// How the scripted provider answers one sort key.
#[derive(Debug, Clone, Copy)]
enum Answer {
    Coins(usize),
    Empty,
    Status(u16),
    Timeout,
}

struct ScriptedProvider {
    answers: Vec<(String, Answer)>,
}

#[async_trait]
impl RankingsProvider for ScriptedProvider {
    fn id(&self) -> &'static str {
        "SCRIPTED"
    }

    async fn list_coins(
        &self,
        request: &RankingRequest,
    ) -> Result<Vec<ProviderCoin>, MarketDataError> {
        let answer = self
            .answers
            .iter()
            .find(|(key, _)| *key == request.sort)
            .map(|(_, answer)| *answer)
            .unwrap_or(Answer::Empty);

        match answer {
            Answer::Coins(count) => Ok((0..count.min(request.limit))
                .map(|i| {
                    let mut coin = ProviderCoin::new(format!("Coin {}", i), format!("C{}", i));
                    coin.price = 1.0 + i as f64;
                    coin.market_cap = 1e9 * (count - i) as f64;
                    coin
                })
                .collect()),
            Answer::Empty => Err(MarketDataError::NoData),
            Answer::Status(status) => Err(MarketDataError::http_status(status, "nope")),
            Answer::Timeout => Err(MarketDataError::Timeout {
                provider: "SCRIPTED".to_string(),
                timeout_secs: 30,
            }),
        }
    }
}

// =============================================================================
// Generators
// =============================================================================

fn arb_answer() -> impl Strategy<Value = Answer> {
    prop_oneof![
        3 => (1usize..15).prop_map(Answer::Coins),
        1 => Just(Answer::Empty),
        1 => prop_oneof![Just(400u16), Just(500), Just(503)].prop_map(Answer::Status),
        1 => Just(Answer::Timeout),
    ]
}

/// One answer per standard metric.
fn arb_script() -> impl Strategy<Value = Vec<(String, Answer)>> {
    let keys: Vec<String> = MetricRegistry::standard().keys().map(str::to_string).collect();
    proptest::collection::vec(arb_answer(), keys.len())
        .prop_map(move |answers| keys.iter().cloned().zip(answers).collect())
}

fn run_script(script: Vec<(String, Answer)>, limit: usize) -> Snapshot {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .start_paused(true)
        .build()
        .unwrap();

    runtime.block_on(async move {
        let provider = Arc::new(ScriptedProvider { answers: script });
        let registry = Arc::new(MetricRegistry::standard());
        let orchestrator = FetchOrchestrator::new(MetricFetcher::new(provider, registry));
        orchestrator.run_all(limit).await.unwrap()
    })
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Every registered metric is present exactly once, whatever failed.
    #[test]
    fn prop_snapshot_covers_registry(script in arb_script(), limit in 1usize..=20) {
        let registry = MetricRegistry::standard();
        let snapshot = run_script(script, limit);

        prop_assert_eq!(snapshot.metric_count, registry.len());
        prop_assert_eq!(snapshot.outcomes_by_key.len(), snapshot.metric_count);

        let keys: HashSet<&str> = snapshot.outcomes_by_key.keys().map(String::as_str).collect();
        let expected: HashSet<&str> = registry.keys().collect();
        prop_assert_eq!(keys, expected);
        prop_assert!(snapshot.ensure_covers(&registry).is_ok());
    }

    /// Success and failure counts add up to the metric count and match the
    /// outcomes.
    #[test]
    fn prop_statistics_add_up(script in arb_script()) {
        let expected_successes = script
            .iter()
            .filter(|(_, answer)| matches!(answer, Answer::Coins(_)))
            .count();
        let snapshot = run_script(script, 10);

        prop_assert_eq!(
            snapshot.stats.success_count + snapshot.stats.failure_count,
            snapshot.metric_count
        );
        prop_assert_eq!(snapshot.stats.success_count, expected_successes);
    }

    /// Failed outcomes carry an error and no entries; successful ones carry
    /// entries, a preview of at most three, and respect the limit.
    #[test]
    fn prop_outcome_shape(script in arb_script(), limit in 1usize..=20) {
        let snapshot = run_script(script, limit);

        for outcome in snapshot.outcomes_by_key.values() {
            if outcome.succeeded() {
                prop_assert!(outcome.item_count() > 0);
                prop_assert!(outcome.item_count() <= limit);
                prop_assert!(outcome.error_message().is_none());
                let preview_len = outcome.item_count().min(3);
                prop_assert_eq!(
                    outcome.preview_entries(),
                    &outcome.all_entries()[..preview_len]
                );
            } else {
                prop_assert_eq!(outcome.item_count(), 0);
                prop_assert!(!outcome.error_message().unwrap_or_default().is_empty());
            }
        }
    }

    /// A published snapshot reads back deep-equal.
    #[test]
    fn prop_publish_read_round_trip(script in arb_script()) {
        let snapshot = run_script(script, 10);

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap();
        let read = runtime.block_on(async {
            let store = Arc::new(InMemorySnapshotStore::new());
            SnapshotPublisher::new(store.clone()).publish(&snapshot).await.unwrap();
            SnapshotReader::new(store).get_current().await
        });

        prop_assert_eq!(read, Some(snapshot));
    }
}
