//! Cryptorank Core - the fetch, format, publish pipeline.
//!
//! A trigger invokes [`SnapshotPipeline::run`], which fans out one provider
//! request per registered metric in rate-limited batches, formats every
//! returned record, and publishes one [`Snapshot`] under a fixed key with a
//! TTL. Readers only ever see complete snapshots.
//!
//! Provider access lives in `cryptorank-market-data`; this crate only sees
//! the [`RankingsProvider`](cryptorank_market_data::RankingsProvider) trait.

pub mod constants;
pub mod errors;
pub mod metrics;
pub mod pipeline;
pub mod rankings;
pub mod snapshot;

pub use metrics::{MetricDescriptor, MetricRegistry, PriorityTier, SemanticType};
pub use pipeline::{RunReport, SnapshotPipeline, TriggerSource};
pub use rankings::{MetricOutcome, RankedEntry};
pub use snapshot::{Snapshot, SnapshotReader, SnapshotStore};

// Re-export error types
pub use errors::Error;
pub use errors::Result;
