//! Snapshot: the unit of publication.

use std::collections::BTreeMap;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};
use crate::metrics::MetricRegistry;
use crate::rankings::MetricOutcome;

/// Run-level statistics, computed once after every fetch of a run finished.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStatistics {
    pub total_duration_ms: u64,
    #[serde(rename = "successful_fetches")]
    pub success_count: usize,
    #[serde(rename = "failed_fetches")]
    pub failure_count: usize,
    /// Whole seconds, serialized as `YYYY-MM-DD HH:MM:SS` (UTC).
    #[serde(rename = "last_update", with = "last_update_format")]
    pub completed_at: DateTime<Utc>,
}

mod last_update_format {
    use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&value.format(FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT)
            .map(|naive| Utc.from_utc_datetime(&naive))
            .map_err(serde::de::Error::custom)
    }
}

/// Result of one complete run across all registered metrics.
///
/// Holds exactly one outcome per registered metric, failures included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(rename = "timestamp")]
    pub captured_at: DateTime<Utc>,
    #[serde(rename = "total_metrics")]
    pub metric_count: usize,
    #[serde(rename = "all_metrics")]
    pub outcomes_by_key: BTreeMap<String, MetricOutcome>,
    #[serde(rename = "fetch_stats")]
    pub stats: RunStatistics,
}

impl Snapshot {
    /// Assemble a snapshot, deriving the success/failure counts from the
    /// outcomes.
    pub fn assemble(
        captured_at: DateTime<Utc>,
        metric_count: usize,
        outcomes_by_key: BTreeMap<String, MetricOutcome>,
        total_duration_ms: u64,
        completed_at: DateTime<Utc>,
    ) -> Self {
        let success_count = outcomes_by_key.values().filter(|o| o.succeeded()).count();
        let failure_count = outcomes_by_key.len() - success_count;

        Self {
            captured_at,
            metric_count,
            outcomes_by_key,
            stats: RunStatistics {
                total_duration_ms,
                success_count,
                failure_count,
                completed_at: completed_at.trunc_subsecs(0),
            },
        }
    }

    pub fn outcome(&self, metric_key: &str) -> Option<&MetricOutcome> {
        self.outcomes_by_key.get(metric_key)
    }

    /// Check that the snapshot holds one outcome per metric and that the
    /// statistics add up.
    pub fn ensure_complete(&self) -> Result<()> {
        let actual = self.outcomes_by_key.len();
        if actual != self.metric_count
            || self.stats.success_count + self.stats.failure_count != self.metric_count
        {
            return Err(Error::IncompleteSnapshot {
                expected: self.metric_count,
                actual,
            });
        }
        Ok(())
    }

    /// Like [`ensure_complete`](Self::ensure_complete), and additionally
    /// requires the key set to be exactly the registry's.
    pub fn ensure_covers(&self, registry: &MetricRegistry) -> Result<()> {
        self.ensure_complete()?;

        let covered = registry
            .keys()
            .filter(|key| self.outcomes_by_key.contains_key(*key))
            .count();
        if self.metric_count != registry.len() || covered != registry.len() {
            return Err(Error::IncompleteSnapshot {
                expected: registry.len(),
                actual: covered,
            });
        }
        Ok(())
    }
}
