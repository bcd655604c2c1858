//! Ranked-list collection.
//!
//! ```text
//! FetchOrchestrator ──batches──▶ MetricFetcher ──▶ RankingsProvider
//!        │                              │
//!        ▼                              ▼
//!    Snapshot  ◀──────────────── MetricOutcome (RankedEntry[])
//! ```
//!
//! - **Model** (`model.rs`) - `RankedEntry`, `MetricOutcome`, `FetchResult`
//! - **Fetcher** (`fetcher.rs`) - One metric, one provider request, never fails
//! - **Orchestrator** (`orchestrator.rs`) - All metrics under the batch policy

pub mod fetcher;
pub mod model;
pub mod orchestrator;

pub use fetcher::MetricFetcher;
pub use model::{FetchResult, MetricOutcome, RankedEntry};
pub use orchestrator::{BatchPolicy, FetchOrchestrator};
