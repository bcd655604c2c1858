//! Core error types for the rankings pipeline.
//!
//! Per-metric fetch failures are not errors at this level: they are recorded
//! in the metric's outcome. What remains here is what can stop a run or a
//! publication.

use thiserror::Error;

use crate::snapshot::StoreError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the pipeline.
#[derive(Error, Debug)]
pub enum Error {
    /// Misconfiguration that makes a run meaningless (e.g. no metrics).
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Unknown metric: {0}")]
    MetricNotFound(String),

    #[error("Snapshot store error: {0}")]
    Store(#[from] StoreError),

    #[error("Snapshot serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A snapshot missing some registered metrics must never be published.
    #[error("Snapshot is incomplete: expected {expected} metrics, found {actual}")]
    IncompleteSnapshot { expected: usize, actual: usize },

    /// Another run holds the pipeline.
    #[error("A pipeline run is already in progress")]
    RunInProgress,
}
