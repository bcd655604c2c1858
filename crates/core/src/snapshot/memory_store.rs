//! In-process snapshot store.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::time::Instant;

use super::store::{SnapshotStore, StoreError};

struct Entry {
    value: String,
    expires_at: Instant,
}

/// TTL store kept in memory.
///
/// Used when no Redis is configured or reachable, and in tests. Expiry is
/// checked on read against the tokio clock.
#[derive(Default)]
pub struct InMemorySnapshotStore {
    entries: RwLock<HashMap<String, Entry>>,
}

impl InMemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SnapshotStore for InMemorySnapshotStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), StoreError> {
        let mut entries = self.entries.write().await;
        entries.insert(
            key.to_string(),
            Entry {
                value,
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.read().await;
        Ok(entries
            .get(key)
            .filter(|entry| Instant::now() < entry.expires_at)
            .map(|entry| entry.value.clone()))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
