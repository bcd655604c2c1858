//! Snapshot publisher: writes the latest snapshot under the well-known key.

use std::sync::Arc;
use std::time::Duration;

use log::{error, info};

use super::model::Snapshot;
use super::store::SnapshotStore;
use crate::constants::{SNAPSHOT_KEY, SNAPSHOT_TTL};
use crate::errors::Result;

pub struct SnapshotPublisher {
    store: Arc<dyn SnapshotStore>,
    key: String,
    ttl: Duration,
}

impl SnapshotPublisher {
    pub fn new(store: Arc<dyn SnapshotStore>) -> Self {
        Self::with_key(store, SNAPSHOT_KEY, SNAPSHOT_TTL)
    }

    pub fn with_key(store: Arc<dyn SnapshotStore>, key: impl Into<String>, ttl: Duration) -> Self {
        Self {
            store,
            key: key.into(),
            ttl,
        }
    }

    /// Serialize and store `snapshot`, replacing whatever was there.
    ///
    /// An incomplete snapshot is refused before touching the store. Store
    /// failures are logged and returned; the previous value stays in place
    /// until its own TTL runs out.
    pub async fn publish(&self, snapshot: &Snapshot) -> Result<()> {
        snapshot.ensure_complete()?;

        let payload = serde_json::to_string(snapshot)?;
        let bytes = payload.len();

        match self.store.set(&self.key, payload, self.ttl).await {
            Ok(()) => {
                info!(
                    "Published snapshot to {} key '{}' ({} bytes, ttl {}s)",
                    self.store.backend(),
                    self.key,
                    bytes,
                    self.ttl.as_secs()
                );
                Ok(())
            }
            Err(e) => {
                error!("Failed to publish snapshot to {}: {}", self.store.backend(), e);
                Err(e.into())
            }
        }
    }
}
