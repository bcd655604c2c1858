//! Snapshot store contract.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Errors from a snapshot store backend.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backend could not be reached.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// The backend answered with an error.
    #[error("Store backend error: {0}")]
    Backend(String),
}

/// Key/value store with per-key expiry.
///
/// `set` is an unconditional whole-value overwrite; `get` returns `None` for
/// keys that were never written and for keys whose TTL elapsed.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Short backend name for logs and health output (`"redis"`, `"memory"`).
    fn backend(&self) -> &'static str;

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), StoreError>;

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Cheap reachability check.
    async fn ping(&self) -> Result<(), StoreError>;
}
