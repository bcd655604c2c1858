//! Ranked entries and per-metric fetch outcomes.

use serde::{Deserialize, Serialize};

use crate::constants::PREVIEW_LEN;
use crate::metrics::{MetricDescriptor, PriorityTier};

/// One item of a metric's ranked list, formatted for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedEntry {
    #[serde(rename = "name")]
    pub entity_name: String,
    #[serde(rename = "symbol")]
    pub entity_symbol: String,
    #[serde(rename = "value")]
    pub formatted_value: String,
    #[serde(rename = "sort")]
    pub metric_key: String,
}

impl RankedEntry {
    pub fn new(
        entity_name: impl Into<String>,
        entity_symbol: impl Into<String>,
        formatted_value: impl Into<String>,
        metric_key: impl Into<String>,
    ) -> Self {
        Self {
            entity_name: entity_name.into(),
            entity_symbol: entity_symbol.into(),
            formatted_value: formatted_value.into(),
            metric_key: metric_key.into(),
        }
    }
}

/// What one fetch attempt produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult {
    /// Non-empty list in provider rank order.
    Success { entries: Vec<RankedEntry> },
    Failure { error: String },
}

/// Result of fetching one metric, success or failure.
///
/// Serializes to the flat snapshot shape (`success`, `data_count`,
/// `all_data`, `top_3_preview`, `error`), all derived from `result`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "MetricOutcomeWire", try_from = "MetricOutcomeWire")]
pub struct MetricOutcome {
    pub display_name: String,
    pub priority: PriorityTier,
    pub description: String,
    pub fetch_duration_ms: u64,
    pub result: FetchResult,
}

impl MetricOutcome {
    /// Successful outcome. An empty entry list is recorded as a failure.
    pub fn success(
        descriptor: &MetricDescriptor,
        entries: Vec<RankedEntry>,
        fetch_duration_ms: u64,
    ) -> Self {
        let result = if entries.is_empty() {
            FetchResult::Failure {
                error: "No data returned from API".to_string(),
            }
        } else {
            FetchResult::Success { entries }
        };
        Self::with_result(descriptor, result, fetch_duration_ms)
    }

    pub fn failure(
        descriptor: &MetricDescriptor,
        error: impl Into<String>,
        fetch_duration_ms: u64,
    ) -> Self {
        Self::with_result(
            descriptor,
            FetchResult::Failure {
                error: error.into(),
            },
            fetch_duration_ms,
        )
    }

    /// Outcome for a key the registry does not know.
    pub fn unknown_metric(key: &str) -> Self {
        Self {
            display_name: key.to_string(),
            priority: PriorityTier::Unknown,
            description: "Unknown metric".to_string(),
            fetch_duration_ms: 0,
            result: FetchResult::Failure {
                error: format!("Unknown sort type: {}", key),
            },
        }
    }

    fn with_result(descriptor: &MetricDescriptor, result: FetchResult, fetch_duration_ms: u64) -> Self {
        Self {
            display_name: descriptor.display_name.clone(),
            priority: descriptor.priority,
            description: descriptor.description.clone(),
            fetch_duration_ms,
            result,
        }
    }

    pub fn succeeded(&self) -> bool {
        matches!(self.result, FetchResult::Success { .. })
    }

    /// Entries in provider order; empty for failures.
    pub fn all_entries(&self) -> &[RankedEntry] {
        match &self.result {
            FetchResult::Success { entries } => entries,
            FetchResult::Failure { .. } => &[],
        }
    }

    /// The first `PREVIEW_LEN` entries.
    pub fn preview_entries(&self) -> &[RankedEntry] {
        let entries = self.all_entries();
        &entries[..entries.len().min(PREVIEW_LEN)]
    }

    pub fn item_count(&self) -> usize {
        self.all_entries().len()
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.result {
            FetchResult::Success { .. } => None,
            FetchResult::Failure { error } => Some(error),
        }
    }
}

// =============================================================================
// Wire format
// =============================================================================

#[derive(Serialize, Deserialize)]
struct MetricOutcomeWire {
    name: String,
    priority: PriorityTier,
    description: String,
    success: bool,
    #[serde(default)]
    data_count: usize,
    #[serde(default)]
    all_data: Option<Vec<RankedEntry>>,
    #[serde(default)]
    top_3_preview: Option<Vec<RankedEntry>>,
    #[serde(default)]
    fetch_time_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl From<MetricOutcome> for MetricOutcomeWire {
    fn from(outcome: MetricOutcome) -> Self {
        let preview = outcome.preview_entries().to_vec();
        let data_count = outcome.item_count();
        let success = outcome.succeeded();

        let (all_data, error) = match outcome.result {
            FetchResult::Success { entries } => (entries, None),
            FetchResult::Failure { error } => (Vec::new(), Some(error)),
        };

        Self {
            name: outcome.display_name,
            priority: outcome.priority,
            description: outcome.description,
            success,
            data_count,
            all_data: Some(all_data),
            top_3_preview: Some(preview),
            fetch_time_ms: outcome.fetch_duration_ms,
            error,
        }
    }
}

impl TryFrom<MetricOutcomeWire> for MetricOutcome {
    type Error = String;

    fn try_from(wire: MetricOutcomeWire) -> Result<Self, Self::Error> {
        let result = match (wire.success, wire.error) {
            (true, None) => {
                let entries = wire.all_data.unwrap_or_default();
                if entries.is_empty() {
                    return Err(format!("successful metric '{}' has no data", wire.name));
                }
                FetchResult::Success { entries }
            }
            (true, Some(_)) => {
                return Err(format!("successful metric '{}' carries an error", wire.name));
            }
            (false, Some(error)) => FetchResult::Failure { error },
            (false, None) => {
                return Err(format!("failed metric '{}' has no error message", wire.name));
            }
        };

        Ok(Self {
            display_name: wire.name,
            priority: wire.priority,
            description: wire.description,
            fetch_duration_ms: wire.fetch_time_ms,
            result,
        })
    }
}
