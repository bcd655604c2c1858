//! Metric registry: the immutable table of metrics a run collects.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

// =============================================================================
// Priority Tier
// =============================================================================

/// Priority tier of a metric.
///
/// Registered metrics are always `High` or `Medium`. `Unknown` only appears on
/// outcomes produced for keys the registry does not know.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityTier {
    High,
    Medium,
    Unknown,
}

impl PriorityTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriorityTier::High => "high",
            PriorityTier::Medium => "medium",
            PriorityTier::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for PriorityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Semantic Type
// =============================================================================

/// Formatting category of a metric's raw values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SemanticType {
    /// Dollar amounts scaled to K/M/B/T (market cap, volume)
    CurrencyLarge,
    /// Dollar amount with two decimals, no scaling
    CurrencyPrice,
    /// Percent change, already in percent units
    Percentage,
    /// Integer ranking position
    IntegerRank,
    /// Plain counts scaled to K/M/B/T/Q
    CountLarge,
    /// Share of a total, already in percent units
    PercentageDominance,
    /// Token supply on its own K..Sx ladder
    SupplyLarge,
}

impl SemanticType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SemanticType::CurrencyLarge => "currency-large",
            SemanticType::CurrencyPrice => "currency-price",
            SemanticType::Percentage => "percentage",
            SemanticType::IntegerRank => "integer-rank",
            SemanticType::CountLarge => "count-large",
            SemanticType::PercentageDominance => "percentage-dominance",
            SemanticType::SupplyLarge => "supply-large",
        }
    }

    /// Whether `format(-x) == "-" + format(x)` holds for this type.
    pub fn supports_negative(&self) -> bool {
        !matches!(self, SemanticType::SupplyLarge | SemanticType::IntegerRank)
    }
}

// =============================================================================
// Metric Descriptor
// =============================================================================

/// Static description of one metric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricDescriptor {
    /// Provider sort key, e.g. `market_cap`
    pub key: String,
    pub display_name: String,
    pub priority: PriorityTier,
    pub description: String,
    pub semantic_type: SemanticType,
}

impl MetricDescriptor {
    pub fn new(
        key: impl Into<String>,
        display_name: impl Into<String>,
        priority: PriorityTier,
        description: impl Into<String>,
        semantic_type: SemanticType,
    ) -> Self {
        Self {
            key: key.into(),
            display_name: display_name.into(),
            priority,
            description: description.into(),
            semantic_type,
        }
    }
}

/// The metrics collected by a standard run.
const STANDARD_METRICS: [(&str, &str, PriorityTier, &str, SemanticType); 11] = [
    (
        "alt_rank",
        "AltRank™",
        PriorityTier::High,
        "Proprietary Performance Ranking",
        SemanticType::IntegerRank,
    ),
    (
        "circulating_supply",
        "Circulating Supply",
        PriorityTier::Medium,
        "Circulating Token Supply",
        SemanticType::SupplyLarge,
    ),
    (
        "interactions",
        "Social Interactions",
        PriorityTier::High,
        "Social Engagements",
        SemanticType::CountLarge,
    ),
    (
        "market_cap",
        "Market Cap",
        PriorityTier::High,
        "Market Capitalization",
        SemanticType::CurrencyLarge,
    ),
    (
        "market_dominance",
        "Market Dominance",
        PriorityTier::Medium,
        "Market Cap Percentage",
        SemanticType::PercentageDominance,
    ),
    (
        "percent_change_1h",
        "1h Change",
        PriorityTier::High,
        "1 Hour Price Change",
        SemanticType::Percentage,
    ),
    (
        "percent_change_24h",
        "24h Change",
        PriorityTier::High,
        "24 Hour Price Change",
        SemanticType::Percentage,
    ),
    (
        "percent_change_7d",
        "7d Change",
        PriorityTier::High,
        "7 Day Price Change",
        SemanticType::Percentage,
    ),
    (
        "price",
        "Price",
        PriorityTier::High,
        "Current USD Price",
        SemanticType::CurrencyPrice,
    ),
    (
        "social_dominance",
        "Social Dominance",
        PriorityTier::Medium,
        "Social Volume Percentage",
        SemanticType::PercentageDominance,
    ),
    (
        "volume_24h",
        "24h Volume",
        PriorityTier::High,
        "24 Hour Trading Volume",
        SemanticType::CurrencyLarge,
    ),
];

// =============================================================================
// Registry
// =============================================================================

/// Immutable, key-ordered table of metric descriptors.
///
/// Built once at startup and shared read-only (usually behind an `Arc`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricRegistry {
    descriptors: Vec<MetricDescriptor>,
}

impl MetricRegistry {
    /// The standard eleven-metric table.
    pub fn standard() -> Self {
        let descriptors = STANDARD_METRICS
            .iter()
            .map(|(key, name, priority, description, semantic_type)| {
                MetricDescriptor::new(*key, *name, *priority, *description, *semantic_type)
            })
            .collect();
        Self { descriptors }
    }

    /// Build a registry from a custom descriptor list.
    ///
    /// Descriptors are ordered by key. An empty list, a duplicate key, or a
    /// descriptor tiered `Unknown` is a configuration error.
    pub fn from_descriptors(mut descriptors: Vec<MetricDescriptor>) -> Result<Self> {
        if descriptors.is_empty() {
            return Err(Error::Configuration(
                "metric registry must contain at least one metric".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for descriptor in &descriptors {
            if !seen.insert(descriptor.key.as_str()) {
                return Err(Error::Configuration(format!(
                    "duplicate metric key '{}'",
                    descriptor.key
                )));
            }
            if descriptor.priority == PriorityTier::Unknown {
                return Err(Error::Configuration(format!(
                    "metric '{}' has no priority tier",
                    descriptor.key
                )));
            }
        }

        descriptors.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(Self { descriptors })
    }

    /// All descriptors, ordered by key.
    pub fn list_metrics(&self) -> &[MetricDescriptor] {
        &self.descriptors
    }

    pub fn describe(&self, key: &str) -> Result<&MetricDescriptor> {
        self.descriptors
            .binary_search_by(|d| d.key.as_str().cmp(key))
            .map(|index| &self.descriptors[index])
            .map_err(|_| Error::MetricNotFound(key.to_string()))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.describe(key).is_ok()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.descriptors.iter().map(|d| d.key.as_str())
    }

    /// Keys in the given tier, in key order.
    pub fn keys_by_tier(&self, tier: PriorityTier) -> Vec<&str> {
        self.descriptors
            .iter()
            .filter(|d| d.priority == tier)
            .map(|d| d.key.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

impl Default for MetricRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
