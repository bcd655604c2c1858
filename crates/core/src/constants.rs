use std::time::Duration;

/// Metrics fetched concurrently per batch
pub const BATCH_SIZE: usize = 5;

/// Pause between two consecutive batches (never after the last one)
pub const BATCH_PAUSE: Duration = Duration::from_secs(1);

/// Timeout for a single provider request
pub const PROVIDER_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Items requested per metric
pub const DEFAULT_METRIC_LIMIT: usize = 10;

/// Upper bound accepted for a per-metric item limit
pub const MAX_METRIC_LIMIT: usize = 100;

/// Entries copied into an outcome's preview
pub const PREVIEW_LEN: usize = 3;

/// Store key holding the latest snapshot
pub const SNAPSHOT_KEY: &str = "crypto:latest";

/// Lifetime of a published snapshot
pub const SNAPSHOT_TTL: Duration = Duration::from_secs(15 * 60);

/// Cadence of scheduled pipeline runs
pub const SCHEDULE_INTERVAL: Duration = Duration::from_secs(5 * 60);
